use super::{DiBinding, DiGraph, DiResolution, ResolutionKind};
use crate::config::DiConfig;
use crate::error::ConfigurationError;
use crate::parser::{descendants, node_text};
use crate::project::{ProjectModel, SourceFile};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, trace};
use tree_sitter::Node;

/// Argument kinds whose bodies are not part of a call chain's own text
const FUNCTION_KINDS: &[&str] = &["arrow_function", "function_expression", "function"];

/// Extracts DI bindings and resolutions with bounded textual patterns
pub struct DiGraphBuilder {
    // Files that hold `container.bind(...)` registrations
    registration_file: Regex,
    // `.to(ClassName)`
    bind_target: Regex,
    // `TOKENS.Name`
    token: Regex,
    // `@inject(TOKENS.Name)`
    inject: Regex,
    // `@multiInject(TOKENS.Name)`
    multi_inject: Regex,
    // `container.get(TOKENS.Name)`, `container.get<T>(TOKENS.Name)`
    container_lookup: Regex,
}

impl DiGraphBuilder {
    pub fn new(config: &DiConfig) -> Result<Self, ConfigurationError> {
        let namespace = regex::escape(&config.tokens_namespace);

        Ok(Self {
            registration_file: compile(&config.registration_pattern)?,
            bind_target: compile(r"\.to\(\s*(\w+)\s*\)")?,
            token: compile(&format!(r"\b{}\.(\w+)", namespace))?,
            inject: compile(&format!(
                r"@(?:{})\(\s*{}\.(\w+)\s*\)",
                alternation(&config.inject_decorators),
                namespace
            ))?,
            multi_inject: compile(&format!(
                r"@(?:{})\(\s*{}\.(\w+)\s*\)",
                alternation(&config.multi_inject_decorators),
                namespace
            ))?,
            container_lookup: compile(&format!(
                r"\b(?:{})\.(?:{})[<(].*?\b{}\.(\w+)",
                alternation(&config.container_names),
                alternation(&config.lookup_methods),
                namespace
            ))?,
        })
    }

    /// Whether `path` is a registration module
    pub fn is_registration_file(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.registration_file.is_match(&normalized)
    }

    pub fn build(&self, model: &ProjectModel) -> DiGraph {
        let mut graph = DiGraph::default();

        for file in model.source_files() {
            if self.is_registration_file(&file.path) {
                graph.bindings.extend(self.extract_bindings(file));
            }
            graph
                .resolutions
                .extend(self.extract_resolutions(file, model.full_text(file)));
        }

        debug!(
            "DI graph: {} bindings, {} resolutions",
            graph.bindings.len(),
            graph.resolutions.len()
        );
        graph
    }

    /// One binding per call chain, first binding of a token per file
    fn extract_bindings(&self, file: &SourceFile) -> Vec<DiBinding> {
        let source = file.text();
        let mut bindings = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut chain_calls = HashSet::new();

        for node in descendants(file.tree().root_node()) {
            if node.kind() != "call_expression" || chain_calls.contains(&node.id()) {
                continue;
            }

            let Some((token, class_name)) = self.match_binding(&chain_text(node, source)) else {
                continue;
            };

            collect_chain(node, &mut chain_calls);

            if !seen_tokens.insert(token.clone()) {
                trace!("Duplicate binding of {} in {}", token, file.path.display());
                continue;
            }

            bindings.push(DiBinding {
                token,
                class_name,
                file: file.path.clone(),
                line: node.start_position().row + 1,
            });
        }

        bindings
    }

    /// `(token, class)` when the text has both a bind target and a token
    fn match_binding(&self, text: &str) -> Option<(String, String)> {
        let class_name = self.bind_target.captures(text)?.get(1)?.as_str();
        let token = self.token.captures(text)?.get(1)?.as_str();
        Some((token.to_string(), class_name.to_string()))
    }

    fn extract_resolutions(&self, file: &SourceFile, text: &str) -> Vec<DiResolution> {
        let patterns = [
            (&self.inject, ResolutionKind::Inject),
            (&self.multi_inject, ResolutionKind::MultiInject),
            (&self.container_lookup, ResolutionKind::ContainerLookup),
        ];

        let mut found: Vec<(usize, DiResolution)> = Vec::new();
        for (pattern, kind) in patterns {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                found.push((
                    whole.start(),
                    DiResolution {
                        token: token.as_str().to_string(),
                        file: file.path.clone(),
                        line: line_at(text, whole.start()),
                        kind,
                    },
                ));
            }
        }

        found.sort_by_key(|(offset, _)| *offset);
        found.into_iter().map(|(_, resolution)| resolution).collect()
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigurationError> {
    Regex::new(pattern).map_err(|e| ConfigurationError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn alternation(names: &[String]) -> String {
    names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|")
}

/// 1-based line of a byte offset
fn line_at(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

/// The call's text with callback bodies blanked out, so a wrapper such as
/// `registerAll(() => { ... })` does not absorb the registrations inside it.
fn chain_text<'a>(call: Node, source: &'a str) -> Cow<'a, str> {
    let mut holes = Vec::new();
    let mut skip_until = 0;
    for node in descendants(call) {
        if node.start_byte() < skip_until {
            continue;
        }
        if FUNCTION_KINDS.contains(&node.kind()) {
            holes.push((node.start_byte(), node.end_byte()));
            skip_until = node.end_byte();
        }
    }

    let text = node_text(call, source);
    if holes.is_empty() {
        return Cow::Borrowed(text);
    }

    let base = call.start_byte();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in holes {
        out.push_str(&text[cursor..start - base]);
        out.push(' ');
        cursor = end - base;
    }
    out.push_str(&text[cursor..]);
    Cow::Owned(out)
}

/// The call plus every call it chains on (`a().b().c()`)
fn collect_chain(call: Node, ids: &mut HashSet<usize>) {
    let mut current = Some(call);
    while let Some(node) = current {
        ids.insert(node.id());
        current = node
            .child_by_field_name("function")
            .and_then(|callee| match callee.kind() {
                "member_expression" => callee.child_by_field_name("object"),
                "call_expression" => Some(callee),
                _ => None,
            })
            .filter(|inner| inner.kind() == "call_expression");
    }
}
