use super::{Declaration, Location};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Syntactic node kind of an occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccurrenceKind {
    /// Value-space identifier (`Foo`, `new Foo()`, `foo()`)
    Identifier,
    /// Type-space identifier (`x: Foo`, `implements Foo`)
    TypeIdentifier,
    /// Property name (`x.run()`, `{ run: ... }`)
    PropertyIdentifier,
    /// Object literal shorthand (`{ Foo }`)
    ShorthandProperty,
    /// Destructuring shorthand (`const { run } = x`)
    ShorthandPattern,
}

impl OccurrenceKind {
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "identifier" => Some(OccurrenceKind::Identifier),
            "type_identifier" => Some(OccurrenceKind::TypeIdentifier),
            "property_identifier" => Some(OccurrenceKind::PropertyIdentifier),
            "shorthand_property_identifier" => Some(OccurrenceKind::ShorthandProperty),
            "shorthand_property_identifier_pattern" => Some(OccurrenceKind::ShorthandPattern),
            _ => None,
        }
    }

    /// Can this occurrence name a class member?
    pub fn is_member_access(&self) -> bool {
        matches!(
            self,
            OccurrenceKind::PropertyIdentifier | OccurrenceKind::ShorthandPattern
        )
    }

    /// Can this occurrence name a module-level binding?
    pub fn is_binding(&self) -> bool {
        matches!(
            self,
            OccurrenceKind::Identifier
                | OccurrenceKind::TypeIdentifier
                | OccurrenceKind::ShorthandProperty
                | OccurrenceKind::ShorthandPattern
        )
    }
}

/// Syntactic context an occurrence appears in, derived from its parent node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceContext {
    /// `import { Foo } from ...`
    ImportSpecifier,
    /// `import Foo from ...`, `import * as Foo from ...`
    ImportClause,
    /// `import Foo = require(...)`
    ImportDeclaration,
    /// `export { Foo }`
    ExportSpecifier,
    /// `export default Foo`, `export = Foo`
    ExportDeclaration,
    /// Type annotation, generic argument, heritage type
    TypeReference,
    /// `typeof Foo` in type position
    TypeQuery,
    /// The name of a declaration
    Declaration,
    /// Anything else: calls, construction, property access, values
    Use,
}

impl ReferenceContext {
    pub fn is_import(&self) -> bool {
        matches!(
            self,
            ReferenceContext::ImportSpecifier
                | ReferenceContext::ImportClause
                | ReferenceContext::ImportDeclaration
        )
    }

    pub fn is_export(&self) -> bool {
        matches!(
            self,
            ReferenceContext::ExportSpecifier | ReferenceContext::ExportDeclaration
        )
    }

    pub fn is_type_only(&self) -> bool {
        matches!(
            self,
            ReferenceContext::TypeReference | ReferenceContext::TypeQuery
        )
    }
}

/// A syntactic occurrence of a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// The name/identifier used in the reference
    pub name: String,

    pub kind: OccurrenceKind,

    pub context: ReferenceContext,

    /// Location where the reference occurs
    pub location: Location,

    /// Plain identifier a property access is made on (`console` in `console.warn`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl Reference {
    pub fn new(name: String, kind: OccurrenceKind, context: ReferenceContext, location: Location) -> Self {
        Self {
            name,
            kind,
            context,
            location,
            receiver: None,
        }
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }
}

/// `import { imported as local }` inside `file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAlias {
    pub imported: String,
    pub local: String,
    pub file: PathBuf,
}

/// Project-wide index of name occurrences
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    by_name: HashMap<String, Vec<Reference>>,

    /// Imported name -> local aliases
    aliases: HashMap<String, Vec<ImportAlias>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reference: Reference) {
        self.by_name
            .entry(reference.name.clone())
            .or_default()
            .push(reference);
    }

    pub fn add_alias(&mut self, alias: ImportAlias) {
        self.aliases
            .entry(alias.imported.clone())
            .or_default()
            .push(alias);
    }

    /// All occurrences that may refer to `decl`, its own name node included.
    ///
    /// Declaration sites of other symbols that share the name are not
    /// references to `decl` and are left out.
    pub fn references_to(&self, decl: &Declaration) -> Vec<Reference> {
        let member = decl.kind.is_member();
        let fits = |r: &Reference| {
            if member {
                r.kind.is_member_access()
            } else {
                r.kind.is_binding()
            }
        };
        let own_site = |r: &Reference| {
            r.location.file == decl.id.file && r.location.start_byte == decl.name_start
        };

        let mut references: Vec<Reference> = self
            .by_name
            .get(&decl.name)
            .into_iter()
            .flatten()
            .filter(|r| own_site(r) || (fits(r) && r.context != ReferenceContext::Declaration))
            .cloned()
            .collect();

        if !member {
            for alias in self.aliases.get(&decl.name).into_iter().flatten() {
                references.extend(
                    self.by_name
                        .get(&alias.local)
                        .into_iter()
                        .flatten()
                        .filter(|r| {
                            r.location.file == alias.file
                                && fits(r)
                                && r.context != ReferenceContext::Declaration
                        })
                        .cloned(),
                );
            }
        }

        references
    }

    /// Total number of indexed occurrences
    pub fn occurrence_count(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }
}
