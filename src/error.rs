//! Error taxonomy.
//!
//! Only [`ConfigurationError`] ever reaches a caller of the analyzer. A
//! [`SymbolAnalysisError`] is recovered locally: the affected symbol is
//! skipped and analysis continues.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal: the project (or the analyzer settings) cannot be loaded.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigurationError {
    #[error("Configuration file not found: {}", path.display())]
    #[diagnostic(
        code(deadwire::config::not_found),
        help("pass the path of an existing tsconfig.json")
    )]
    NotFound { path: PathBuf },

    #[error("Failed to read configuration file: {}", path.display())]
    #[diagnostic(code(deadwire::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {}: {message}", path.display())]
    #[diagnostic(code(deadwire::config::parse))]
    Parse { path: PathBuf, message: String },

    #[error("Circular `extends` chain through {}", path.display())]
    #[diagnostic(code(deadwire::config::extends_cycle))]
    ExtendsCycle { path: PathBuf },

    #[error("Invalid pattern `{pattern}`: {message}")]
    #[diagnostic(code(deadwire::config::pattern))]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid analyzer settings in {}: {message}", path.display())]
    #[diagnostic(
        code(deadwire::config::settings),
        help("settings files may be YAML or TOML")
    )]
    InvalidSettings { path: PathBuf, message: String },
}

/// Recoverable: references for one symbol could not be computed.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum SymbolAnalysisError {
    #[error("Declaration `{name}` at {}:{line} contains syntax errors", file.display())]
    #[diagnostic(code(deadwire::symbol::malformed))]
    Malformed {
        name: String,
        file: PathBuf,
        line: usize,
    },

    #[error("Declaration `{name}` belongs to a file outside the project: {}", file.display())]
    #[diagnostic(code(deadwire::symbol::unknown_file))]
    UnknownFile { name: String, file: PathBuf },
}
