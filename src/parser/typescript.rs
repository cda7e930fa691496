use super::common::{
    child_of_kind, descendants, has_keyword, node_location, node_text, ParseResult, Parser,
};
use crate::discovery::FileType;
use crate::graph::{
    Declaration, DeclarationId, DeclarationKind, ImportAlias, OccurrenceKind, Reference,
    ReferenceContext, Visibility,
};
use miette::{IntoDiagnostic, Result};
use std::collections::HashSet;
use std::path::Path;
use tree_sitter::{Node, Parser as TsParser};
use tracing::debug;

/// Parent kinds whose `name` field introduces a declaration
const DECLARATION_PARENTS: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "class",
    "method_definition",
    "method_signature",
    "abstract_method_signature",
    "function_declaration",
    "generator_function_declaration",
    "function_signature",
    "function_expression",
    "interface_declaration",
    "property_signature",
    "public_field_definition",
    "variable_declarator",
    "type_alias_declaration",
    "enum_declaration",
];

/// TypeScript/TSX source code parser using tree-sitter
pub struct TypeScriptParser;

impl TypeScriptParser {
    pub fn new() -> Self {
        Self
    }

    /// `.tsx` and JavaScript sources need the TSX grammar for JSX syntax
    fn language_for(path: &Path) -> tree_sitter::Language {
        match FileType::from_path(path) {
            Some(FileType::TypeScript) => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            _ => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn extract_declarations(&self, path: &Path, root: Node, source: &str) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        let mut local_exports = HashSet::new();

        let mut cursor = root.walk();
        for statement in root.named_children(&mut cursor) {
            if statement.kind() == "export_statement" {
                collect_local_exports(statement, source, &mut local_exports);
            }
            self.extract_statement(path, statement, statement, false, source, &mut declarations);
        }

        // `export { Foo }` and `export default Foo` export an earlier declaration
        for decl in declarations.iter_mut() {
            if decl.parent.is_none() && local_exports.contains(decl.name.as_str()) {
                decl.is_exported = true;
            }
        }

        declarations
    }

    /// `outer` is the outermost node of the statement (the `export` wrapper
    /// when there is one); it determines the reported position.
    fn extract_statement(
        &self,
        path: &Path,
        node: Node,
        outer: Node,
        exported: bool,
        source: &str,
        declarations: &mut Vec<Declaration>,
    ) {
        match node.kind() {
            "export_statement" => {
                if let Some(inner) = node.child_by_field_name("declaration") {
                    self.extract_statement(path, inner, outer, true, source, declarations);
                }
            }
            "ambient_declaration" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.extract_statement(path, child, outer, exported, source, declarations);
                }
            }
            "class_declaration" | "abstract_class_declaration" => {
                self.extract_class(path, node, outer, exported, source, declarations);
            }
            "interface_declaration" => {
                self.extract_interface(path, node, outer, exported, source, declarations);
            }
            "function_declaration" | "generator_function_declaration" => {
                if let Some(mut decl) =
                    new_declaration(path, node, outer, DeclarationKind::Function, source)
                {
                    decl.is_exported = exported;
                    declarations.push(decl);
                }
            }
            _ => {}
        }
    }

    fn extract_class(
        &self,
        path: &Path,
        node: Node,
        outer: Node,
        exported: bool,
        source: &str,
        declarations: &mut Vec<Declaration>,
    ) {
        let Some(mut class) = new_declaration(path, node, outer, DeclarationKind::Class, source)
        else {
            return;
        };
        class.is_exported = exported;
        class.is_abstract = node.kind() == "abstract_class_declaration";

        if let Some(heritage) = child_of_kind(node, "class_heritage") {
            let mut cursor = heritage.walk();
            for clause in heritage.named_children(&mut cursor) {
                match clause.kind() {
                    "extends_clause" => {
                        let mut value_cursor = clause.walk();
                        class.extends.extend(
                            clause
                                .children_by_field_name("value", &mut value_cursor)
                                .filter_map(|value| heritage_name(node_text(value, source))),
                        );
                    }
                    "implements_clause" => {
                        let mut type_cursor = clause.walk();
                        class.implements.extend(
                            clause
                                .named_children(&mut type_cursor)
                                .filter_map(|ty| heritage_name(node_text(ty, source))),
                        );
                    }
                    _ => {}
                }
            }
        }

        let class_id = class.id.clone();
        let class_name = class.name.clone();
        declarations.push(class);

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if let Some(method) = self.extract_class_member(path, member, &class_id, &class_name, source)
            {
                declarations.push(method);
            }
        }
    }

    fn extract_class_member(
        &self,
        path: &Path,
        member: Node,
        class_id: &DeclarationId,
        class_name: &str,
        source: &str,
    ) -> Option<Declaration> {
        let is_abstract = match member.kind() {
            "method_definition" => false,
            "abstract_method_signature" => true,
            // Fields, overload signatures, index signatures, decorators
            _ => return None,
        };

        // Accessors behave like properties
        if has_keyword(member, "get") || has_keyword(member, "set") {
            return None;
        }

        let name_node = member.child_by_field_name("name")?;
        let private_name = match name_node.kind() {
            "property_identifier" => false,
            "private_property_identifier" => true,
            // Computed, string and numeric member names
            _ => return None,
        };
        let name = node_text(name_node, source);
        if name == "constructor" {
            return None;
        }

        let mut method = Declaration::new(
            DeclarationId::new(path.to_path_buf(), member.start_byte(), member.end_byte()),
            name.to_string(),
            DeclarationKind::Method,
            node_location(path, member),
        );
        method.qualified_name = format!("{}.{}", class_name, name);
        method.name_start = name_node.start_byte();
        method.parent = Some(class_id.clone());
        method.is_abstract = is_abstract;
        method.is_static = has_keyword(member, "static");
        method.visibility = if private_name {
            Visibility::Private
        } else {
            Visibility::from_accessibility(
                child_of_kind(member, "accessibility_modifier").map(|m| node_text(m, source)),
            )
        };
        method.malformed = member.has_error();

        Some(method)
    }

    fn extract_interface(
        &self,
        path: &Path,
        node: Node,
        outer: Node,
        exported: bool,
        source: &str,
        declarations: &mut Vec<Declaration>,
    ) {
        let Some(mut iface) =
            new_declaration(path, node, outer, DeclarationKind::Interface, source)
        else {
            return;
        };
        iface.is_exported = exported;

        if let Some(clause) = child_of_kind(node, "extends_type_clause") {
            let mut cursor = clause.walk();
            iface.extends.extend(
                clause
                    .named_children(&mut cursor)
                    .filter_map(|ty| heritage_name(node_text(ty, source))),
            );
        }

        let iface_id = iface.id.clone();
        let iface_name = iface.name.clone();
        declarations.push(iface);

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            let kind = match member.kind() {
                "method_signature" => DeclarationKind::InterfaceMethod,
                "property_signature" => DeclarationKind::PropertySignature,
                _ => continue,
            };
            let Some(name_node) = member.child_by_field_name("name") else {
                continue;
            };
            if name_node.kind() != "property_identifier" {
                continue;
            }
            let name = node_text(name_node, source);

            let mut signature = Declaration::new(
                DeclarationId::new(path.to_path_buf(), member.start_byte(), member.end_byte()),
                name.to_string(),
                kind,
                node_location(path, member),
            );
            signature.qualified_name = format!("{}.{}", iface_name, name);
            signature.name_start = name_node.start_byte();
            signature.parent = Some(iface_id.clone());
            signature.malformed = member.has_error();
            declarations.push(signature);
        }
    }

    fn extract_references(
        &self,
        path: &Path,
        root: Node,
        source: &str,
        result: &mut ParseResult,
    ) {
        for node in descendants(root) {
            if node.kind() == "import_specifier" {
                if let (Some(name), Some(alias)) = (
                    node.child_by_field_name("name"),
                    node.child_by_field_name("alias"),
                ) {
                    result.aliases.push(ImportAlias {
                        imported: node_text(name, source).to_string(),
                        local: node_text(alias, source).to_string(),
                        file: path.to_path_buf(),
                    });
                }
                continue;
            }

            let Some(kind) = OccurrenceKind::from_node_kind(node.kind()) else {
                continue;
            };
            let mut reference = Reference::new(
                node_text(node, source).to_string(),
                kind,
                reference_context(node),
                node_location(path, node),
            );
            if let Some(receiver) = member_receiver(node, source) {
                reference = reference.with_receiver(receiver);
            }
            result.references.push(reference);
        }
    }
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for TypeScriptParser {
    fn parse(&self, path: &Path, contents: &str) -> Result<ParseResult> {
        let mut parser = TsParser::new();
        parser
            .set_language(&Self::language_for(path))
            .into_diagnostic()?;

        let tree = parser
            .parse(contents, None)
            .ok_or_else(|| miette::miette!("Failed to parse {}", path.display()))?;

        let root = tree.root_node();
        let declarations = self.extract_declarations(path, root, contents);

        let mut result = ParseResult::new(tree.clone());
        result.declarations = declarations;
        self.extract_references(path, root, contents, &mut result);

        debug!(
            "{}: {} declarations, {} occurrences",
            path.display(),
            result.declarations.len(),
            result.references.len()
        );

        Ok(result)
    }
}

/// Declaration for a named class, interface or function node
fn new_declaration(
    path: &Path,
    node: Node,
    outer: Node,
    kind: DeclarationKind,
    source: &str,
) -> Option<Declaration> {
    let name_node = node.child_by_field_name("name")?;
    let mut decl = Declaration::new(
        DeclarationId::new(path.to_path_buf(), outer.start_byte(), outer.end_byte()),
        node_text(name_node, source).to_string(),
        kind,
        node_location(path, outer),
    );
    decl.name_start = name_node.start_byte();
    decl.malformed = node.has_error();
    Some(decl)
}

/// `export { A, B as C }` (no `from`) and `export default A`
fn collect_local_exports<'a>(statement: Node, source: &'a str, names: &mut HashSet<&'a str>) {
    if statement.child_by_field_name("source").is_some() {
        return;
    }

    if let Some(value) = statement.child_by_field_name("value") {
        if value.kind() == "identifier" {
            names.insert(node_text(value, source));
        }
        return;
    }

    if let Some(clause) = child_of_kind(statement, "export_clause") {
        let mut cursor = clause.walk();
        for specifier in clause.named_children(&mut cursor) {
            if let Some(name) = specifier.child_by_field_name("name") {
                names.insert(node_text(name, source));
            }
        }
    }
}

/// Simple name of a heritage entry: `ns.Base<T>` -> `Base`
fn heritage_name(text: &str) -> Option<String> {
    let end = text.find(['<', '(']).unwrap_or(text.len());
    let name = text[..end].trim().rsplit('.').next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Syntactic context of an identifier-like node, derived from its parent
/// `obj` in `obj.name` when `node` is the property and `obj` a bare identifier
fn member_receiver<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    let parent = node.parent()?;
    if parent.kind() != "member_expression" || parent.child_by_field_name("property") != Some(node) {
        return None;
    }
    let object = parent.child_by_field_name("object")?;
    (object.kind() == "identifier").then(|| node_text(object, source))
}

fn reference_context(node: Node) -> ReferenceContext {
    let Some(parent) = node.parent() else {
        return ReferenceContext::Use;
    };

    if DECLARATION_PARENTS.contains(&parent.kind())
        && parent.child_by_field_name("name") == Some(node)
    {
        return ReferenceContext::Declaration;
    }

    match parent.kind() {
        "import_specifier" => ReferenceContext::ImportSpecifier,
        "import_clause" | "namespace_import" => ReferenceContext::ImportClause,
        "import_statement" | "import_alias" | "import_require_clause" => {
            ReferenceContext::ImportDeclaration
        }
        "export_specifier" => ReferenceContext::ExportSpecifier,
        "export_statement" => ReferenceContext::ExportDeclaration,
        "type_query" => ReferenceContext::TypeQuery,
        "nested_type_identifier" => ReferenceContext::TypeReference,
        _ if node.kind() == "type_identifier" => ReferenceContext::TypeReference,
        _ => ReferenceContext::Use,
    }
}
