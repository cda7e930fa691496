use crate::analysis::{DeadCodeCategory, DeadCodeItem, Severity};
use serde::Serialize;
use std::path::PathBuf;

pub const SOURCE: &str = "dead-code";

/// Host-facing form of a finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// `dead-code:<file>:<line>:<column>:<code>`, stable across runs
    pub id: String,
    pub source: &'static str,
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&DeadCodeItem> for Diagnostic {
    fn from(item: &DeadCodeItem) -> Self {
        let code = item.category.slug();
        let symbol = &item.symbol;
        let message = match item.category {
            DeadCodeCategory::UnresolvedDiToken => format!("Unresolved DI token: {}", symbol),
            DeadCodeCategory::PhantomToken => {
                format!("Phantom token: {} is referenced but never bound", symbol)
            }
            DeadCodeCategory::DeadClass => format!("Dead class: {} has no call-sites", symbol),
            DeadCodeCategory::DeadMethod => format!("Dead method: {}() has no call-sites", symbol),
            DeadCodeCategory::DeadInterfaceMethod => {
                format!("Dead interface method: {}() is never called", symbol)
            }
            DeadCodeCategory::DeadFunction => format!("Dead function: {}() has no call-sites", symbol),
        };

        Self {
            id: format!(
                "{}:{}:{}:{}:{}",
                SOURCE,
                item.file.display(),
                item.line,
                item.column,
                code
            ),
            source: SOURCE,
            file: item.file.clone(),
            line: item.line,
            column: item.column,
            severity: item.category.default_severity(),
            code,
            message,
            detail: item.detail.clone(),
        }
    }
}
