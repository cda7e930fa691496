mod analyzer;
mod classifier;
pub mod detectors;

pub use analyzer::DeadCodeAnalyzer;
pub use classifier::{ReferenceClass, ReferenceClassifier};

use serde::Serialize;
use std::path::PathBuf;

/// Kinds of findings, in the order the passes run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DeadCodeCategory {
    /// A token is bound but never injected
    UnresolvedDiToken,

    /// A token is injected but never bound
    PhantomToken,

    /// An exported class has no call-sites
    DeadClass,

    /// A class method has no call-sites
    DeadMethod,

    /// An interface method signature is never called
    DeadInterfaceMethod,

    /// An exported function has no call-sites
    DeadFunction,
}

impl DeadCodeCategory {
    pub const ALL: [DeadCodeCategory; 6] = [
        DeadCodeCategory::UnresolvedDiToken,
        DeadCodeCategory::PhantomToken,
        DeadCodeCategory::DeadClass,
        DeadCodeCategory::DeadMethod,
        DeadCodeCategory::DeadInterfaceMethod,
        DeadCodeCategory::DeadFunction,
    ];

    /// Stable identifier used as the diagnostic code
    pub fn slug(&self) -> &'static str {
        match self {
            DeadCodeCategory::UnresolvedDiToken => "unresolved-di-token",
            DeadCodeCategory::PhantomToken => "phantom-token",
            DeadCodeCategory::DeadClass => "dead-class",
            DeadCodeCategory::DeadMethod => "dead-method",
            DeadCodeCategory::DeadInterfaceMethod => "dead-interface-method",
            DeadCodeCategory::DeadFunction => "dead-function",
        }
    }

    pub fn default_severity(&self) -> Severity {
        Severity::Warning
    }
}

impl std::fmt::Display for DeadCodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadCodeItem {
    pub category: DeadCodeCategory,

    /// `Widget`, `Helper.run`, `TOKENS.FOO`
    pub symbol: String,

    pub file: PathBuf,

    /// 1-based
    pub line: usize,

    /// 1-based
    pub column: usize,

    pub detail: Option<String>,
}

impl DeadCodeItem {
    pub fn new(category: DeadCodeCategory, symbol: String, file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            category,
            symbol,
            file,
            line,
            column,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
