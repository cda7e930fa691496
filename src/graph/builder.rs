use super::{Declaration, DeclarationKind, Heritage, ImportAlias, Reference, ReferenceIndex, SymbolGraph};
use crate::parser::ParseResult;
use tracing::{debug, trace};

/// Supertype edge waiting for all files to be added
struct UnresolvedHeritage {
    from: super::DeclarationId,
    name: String,
    heritage: Heritage,
    accepts: &'static [DeclarationKind],
}

/// Builder for the symbol graph and the project-wide reference index
pub struct GraphBuilder {
    /// The graph being built
    graph: SymbolGraph,

    references: ReferenceIndex,

    /// `extends`/`implements` names, resolved once every file is in
    unresolved: Vec<UnresolvedHeritage>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: SymbolGraph::new(),
            references: ReferenceIndex::new(),
            unresolved: Vec::new(),
        }
    }

    /// Add the declarations and occurrences of one parsed file
    pub fn add_parsed(&mut self, parsed: ParseResult) -> tree_sitter::Tree {
        let ParseResult {
            tree,
            declarations,
            references,
            aliases,
            ..
        } = parsed;
        self.add_file(declarations, references, aliases);
        tree
    }

    pub fn add_file(
        &mut self,
        declarations: Vec<Declaration>,
        references: Vec<Reference>,
        aliases: Vec<ImportAlias>,
    ) {
        for decl in declarations {
            self.store_heritage(&decl);
            self.graph.add_declaration(decl);
        }
        for reference in references {
            self.references.add(reference);
        }
        for alias in aliases {
            self.references.add_alias(alias);
        }
    }

    fn store_heritage(&mut self, decl: &Declaration) {
        const CLASSES: &[DeclarationKind] = &[DeclarationKind::Class];
        const TYPES: &[DeclarationKind] = &[DeclarationKind::Interface, DeclarationKind::Class];

        let (extends_accepts, implements_accepts) = match decl.kind {
            DeclarationKind::Class => (CLASSES, TYPES),
            // Interfaces may extend classes too
            DeclarationKind::Interface => (TYPES, TYPES),
            _ => return,
        };

        let extends = decl.extends.iter().map(|name| (name, Heritage::Extends, extends_accepts));
        let implements = decl
            .implements
            .iter()
            .map(|name| (name, Heritage::Implements, implements_accepts));

        for (name, heritage, accepts) in extends.chain(implements) {
            self.unresolved.push(UnresolvedHeritage {
                from: decl.id.clone(),
                name: name.clone(),
                heritage,
                accepts,
            });
        }
    }

    /// Build the final graph, resolving heritage names
    pub fn build(mut self) -> (SymbolGraph, ReferenceIndex) {
        self.resolve_heritage();
        debug!(
            "Symbol graph: {} declarations, {} heritage edges, {} occurrences",
            self.graph.declaration_count(),
            self.graph.heritage_count(),
            self.references.occurrence_count()
        );
        (self.graph, self.references)
    }

    /// Names are resolved by simple name; every matching type gets an edge
    fn resolve_heritage(&mut self) {
        let pending = std::mem::take(&mut self.unresolved);

        for entry in pending {
            let targets: Vec<_> = self
                .graph
                .find_by_name(&entry.name)
                .into_iter()
                .filter(|candidate| candidate.id != entry.from && entry.accepts.contains(&candidate.kind))
                .map(|candidate| candidate.id.clone())
                .collect();

            if targets.is_empty() {
                trace!("Unresolved supertype `{}` of {}", entry.name, entry.from);
            }

            for target in targets {
                self.graph.add_heritage(&entry.from, &target, entry.heritage);
            }
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
