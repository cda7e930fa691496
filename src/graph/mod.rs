mod builder;
mod declaration;
pub mod reference;

pub use builder::GraphBuilder;
pub use declaration::{Declaration, DeclarationId, DeclarationKind, Location, Visibility};
pub use reference::{ImportAlias, OccurrenceKind, Reference, ReferenceContext, ReferenceIndex};

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};
use std::collections::{HashMap, HashSet};

/// Relationship between a type and one of its supertypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heritage {
    /// `class A extends B`, `interface A extends B`
    Extends,
    /// `class A implements B`
    Implements,
}

/// Declarations of a project plus the type hierarchy between them
#[derive(Debug)]
pub struct SymbolGraph {
    /// Nodes are DeclarationIds, edges point from a type to its supertypes
    inner: DiGraph<DeclarationId, Heritage>,

    /// Map from DeclarationId to node index
    node_map: HashMap<DeclarationId, NodeIndex>,

    /// Declarations in file-then-source order
    declarations: IndexMap<DeclarationId, Declaration>,

    /// Map from simple name to possible declarations (for resolution)
    name_index: HashMap<String, Vec<DeclarationId>>,

    /// Map from parent to children (for fast member lookup)
    children_index: HashMap<DeclarationId, Vec<DeclarationId>>,
}

impl SymbolGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            inner: DiGraph::new(),
            node_map: HashMap::new(),
            declarations: IndexMap::new(),
            name_index: HashMap::new(),
            children_index: HashMap::new(),
        }
    }

    /// Add a declaration to the graph
    pub fn add_declaration(&mut self, decl: Declaration) -> DeclarationId {
        let id = decl.id.clone();

        let node_idx = self.inner.add_node(id.clone());
        self.node_map.insert(id.clone(), node_idx);

        // Members are only reachable through their parent
        if !decl.kind.is_member() {
            self.name_index
                .entry(decl.name.clone())
                .or_default()
                .push(id.clone());
        }

        if let Some(parent_id) = &decl.parent {
            self.children_index
                .entry(parent_id.clone())
                .or_default()
                .push(id.clone());
        }

        self.declarations.insert(id.clone(), decl);

        id
    }

    /// Record that `from` extends or implements `to`
    pub fn add_heritage(&mut self, from: &DeclarationId, to: &DeclarationId, heritage: Heritage) {
        if let (Some(&from_idx), Some(&to_idx)) = (self.node_map.get(from), self.node_map.get(to)) {
            self.inner.add_edge(from_idx, to_idx, heritage);
        }
    }

    /// Get a declaration by ID
    pub fn get_declaration(&self, id: &DeclarationId) -> Option<&Declaration> {
        self.declarations.get(id)
    }

    /// All declarations, in file-then-source order
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    /// Declarations of one kind, in file-then-source order
    pub fn declarations_of_kind(&self, kind: DeclarationKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.values().filter(move |d| d.kind == kind)
    }

    /// Find module-level declarations by simple name
    pub fn find_by_name(&self, name: &str) -> Vec<&Declaration> {
        self.name_index
            .get(name)
            .map(|ids| ids.iter().filter_map(|id| self.declarations.get(id)).collect())
            .unwrap_or_default()
    }

    /// Get children of a declaration (members of a class or interface)
    pub fn get_children(&self, id: &DeclarationId) -> Vec<&Declaration> {
        self.children_index
            .get(id)
            .map(|children| {
                children
                    .iter()
                    .filter_map(|child| self.declarations.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct supertypes of a declaration
    pub fn supertypes(&self, id: &DeclarationId, heritage: Heritage) -> Vec<&Declaration> {
        let Some(&node_idx) = self.node_map.get(id) else {
            return Vec::new();
        };

        self.inner
            .edges_directed(node_idx, petgraph::Direction::Outgoing)
            .filter(|edge| *edge.weight() == heritage)
            .filter_map(|edge| {
                let target_id = self.inner.node_weight(edge.target())?;
                self.declarations.get(target_id)
            })
            .collect()
    }

    /// Whether some `extends`/`implements` name of `decl` matched no declaration
    pub fn has_unresolved_supertype(&self, decl: &Declaration, heritage: Heritage) -> bool {
        let names = match heritage {
            Heritage::Extends => &decl.extends,
            Heritage::Implements => &decl.implements,
        };
        let resolved: HashSet<&str> = self
            .supertypes(&decl.id, heritage)
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();

        names.iter().any(|name| !resolved.contains(name.as_str()))
    }

    /// Every type a class promises to implement: its `implements` targets
    /// and, transitively, everything those extend.
    pub fn implemented_contracts(&self, class_id: &DeclarationId) -> Vec<&Declaration> {
        let mut seen = HashSet::new();
        let mut contracts = Vec::new();

        for direct in self.supertypes(class_id, Heritage::Implements) {
            let Some(&start) = self.node_map.get(&direct.id) else {
                continue;
            };
            let mut dfs = Dfs::new(&self.inner, start);
            while let Some(node_idx) = dfs.next(&self.inner) {
                if !seen.insert(node_idx) {
                    continue;
                }
                if let Some(decl) = self
                    .inner
                    .node_weight(node_idx)
                    .and_then(|id| self.declarations.get(id))
                {
                    contracts.push(decl);
                }
            }
        }

        contracts
    }

    /// Get the number of declarations
    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    /// Get the number of heritage edges
    pub fn heritage_count(&self) -> usize {
        self.inner.edge_count()
    }
}

impl Default for SymbolGraph {
    fn default() -> Self {
        Self::new()
    }
}
