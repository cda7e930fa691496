use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for a declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclarationId {
    /// File path
    pub file: PathBuf,
    /// Starting byte offset in file
    pub start: usize,
    /// Ending byte offset in file
    pub end: usize,
}

impl DeclarationId {
    pub fn new(file: PathBuf, start: usize, end: usize) -> Self {
        Self { file, start, end }
    }
}

impl std::fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.start, self.end)
    }
}

/// Kind of declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    Class,
    Interface,
    Function,

    /// Method of a class (including abstract method signatures)
    Method,
    /// Method signature of an interface
    InterfaceMethod,
    /// Property signature of an interface
    PropertySignature,
}

impl DeclarationKind {
    pub fn is_type(&self) -> bool {
        matches!(self, DeclarationKind::Class | DeclarationKind::Interface)
    }

    /// Members are looked up through property accesses, not bare identifiers
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Method
                | DeclarationKind::InterfaceMethod
                | DeclarationKind::PropertySignature
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Function => "function",
            DeclarationKind::Method => "method",
            DeclarationKind::InterfaceMethod => "interface method",
            DeclarationKind::PropertySignature => "property signature",
        }
    }
}

/// Visibility modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// TypeScript members are public unless marked otherwise
    pub fn from_accessibility(modifier: Option<&str>) -> Self {
        match modifier {
            Some("private") => Visibility::Private,
            Some("protected") => Visibility::Protected,
            _ => Visibility::Public,
        }
    }
}

/// Location in source code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Starting byte offset
    pub start_byte: usize,
    /// Ending byte offset
    pub end_byte: usize,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize, start_byte: usize, end_byte: usize) -> Self {
        Self {
            file,
            line,
            column,
            start_byte,
            end_byte,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A declaration in the source code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    /// Unique identifier
    pub id: DeclarationId,

    /// Simple name (e.g., "run")
    pub name: String,

    /// Name qualified by its container (e.g., "Helper.run")
    pub qualified_name: String,

    /// Kind of declaration
    pub kind: DeclarationKind,

    /// Visibility modifier
    pub visibility: Visibility,

    /// Location of the declaration, decorators and `export` included
    pub location: Location,

    /// Byte offset of the name node, used to recognise the declaration site
    pub name_start: usize,

    /// Parent declaration (e.g., class for a method)
    pub parent: Option<DeclarationId>,

    /// Whether this declaration is exported from its module
    pub is_exported: bool,

    pub is_static: bool,

    pub is_abstract: bool,

    /// Extended types (base class, or extended interfaces)
    pub extends: Vec<String>,

    /// Implemented interfaces (classes only)
    pub implements: Vec<String>,

    /// The declaration's syntax subtree contains parse errors
    pub malformed: bool,
}

impl Declaration {
    pub fn new(id: DeclarationId, name: String, kind: DeclarationKind, location: Location) -> Self {
        let name_start = id.start;
        Self {
            id,
            qualified_name: name.clone(),
            name,
            kind,
            visibility: Visibility::default(),
            location,
            name_start,
            parent: None,
            is_exported: false,
            is_static: false,
            is_abstract: false,
            extends: Vec::new(),
            implements: Vec::new(),
            malformed: false,
        }
    }

    /// Get a display string for this declaration
    pub fn display(&self) -> String {
        format!(
            "{} {} ({})",
            self.kind.display_name(),
            self.qualified_name,
            self.location
        )
    }
}
