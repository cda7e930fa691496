//! deadwire - dead code and DI wiring analysis for TypeScript projects
//!
//! The analysis pipeline consists of:
//! 1. **Project Model** - Load a tsconfig, enumerate and parse its sources
//! 2. **DI Graph** - Extract token bindings and resolutions
//! 3. **Reference Classification** - Separate call-sites from declarations,
//!    imports, exports, type positions and test code
//! 4. **Dead Code Passes** - Unresolved and phantom tokens, dead classes,
//!    methods, interface methods and (opt-in) functions
//! 5. **Reporting** - Diagnostics for the terminal or as JSON

pub mod analysis;
pub mod config;
pub mod di;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod parser;
pub mod project;
pub mod report;

pub use analysis::{DeadCodeAnalyzer, DeadCodeCategory, DeadCodeItem, ReferenceClassifier, Severity};
pub use config::Config;
pub use di::{DiBinding, DiGraph, DiGraphBuilder, DiResolution};
pub use error::{ConfigurationError, SymbolAnalysisError};
pub use graph::{Declaration, DeclarationKind, Reference};
pub use project::{ProjectLoader, ProjectModel, SourceFile};
pub use report::{Diagnostic, ReportFormat, Reporter};
