use crate::graph::{Declaration, ImportAlias, Location, Reference};
use miette::Result;
use std::path::Path;

/// Result of parsing a source file
#[derive(Debug)]
pub struct ParseResult {
    /// Syntax tree, kept for later passes that walk call expressions
    pub tree: tree_sitter::Tree,

    /// Top-level declarations and their members, in source order
    pub declarations: Vec<Declaration>,

    /// Every identifier-like occurrence in the file
    pub references: Vec<Reference>,

    /// `import { a as b }` renames
    pub aliases: Vec<ImportAlias>,

    /// The tree contains ERROR or MISSING nodes
    pub has_errors: bool,
}

impl ParseResult {
    pub fn new(tree: tree_sitter::Tree) -> Self {
        let has_errors = tree.root_node().has_error();
        Self {
            tree,
            declarations: Vec::new(),
            references: Vec::new(),
            aliases: Vec::new(),
            has_errors,
        }
    }
}

/// Trait for language-specific parsers
pub trait Parser {
    /// Parse a source file and extract declarations and references
    fn parse(&self, path: &Path, contents: &str) -> Result<ParseResult>;
}

/// Helper to convert tree-sitter Point to Location
pub fn point_to_location(
    file: &Path,
    start: tree_sitter::Point,
    start_byte: usize,
    end_byte: usize,
) -> Location {
    Location::new(
        file.to_path_buf(),
        start.row + 1,    // tree-sitter uses 0-indexed lines
        start.column + 1, // tree-sitter uses 0-indexed columns
        start_byte,
        end_byte,
    )
}

/// Location of a whole node
pub fn node_location(file: &Path, node: tree_sitter::Node) -> Location {
    point_to_location(file, node.start_position(), node.start_byte(), node.end_byte())
}

/// Extract text from a node
pub fn node_text<'a>(node: tree_sitter::Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Whether the node has an anonymous child token such as `static` or `get`
pub fn has_keyword(node: tree_sitter::Node, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == keyword);
    found
}

/// First named child of a specific kind
pub fn child_of_kind<'a>(node: tree_sitter::Node<'a>, kind: &str) -> Option<tree_sitter::Node<'a>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Pre-order walk over `node` and everything below it
pub fn descendants(node: tree_sitter::Node) -> impl Iterator<Item = tree_sitter::Node> {
    Descendants {
        cursor: node.walk(),
        finished: false,
    }
}

struct Descendants<'t> {
    cursor: tree_sitter::TreeCursor<'t>,
    finished: bool,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = tree_sitter::Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let current = self.cursor.node();

        // Advance to the next node in pre-order; the cursor never climbs
        // above the node it was created on
        if !self.cursor.goto_first_child() {
            while !self.cursor.goto_next_sibling() {
                if !self.cursor.goto_parent() {
                    self.finished = true;
                    break;
                }
            }
        }

        Some(current)
    }
}
