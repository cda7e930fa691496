mod diagnostic;
mod json;
mod terminal;

pub use diagnostic::Diagnostic;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::analysis::DeadCodeItem;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Reporter for outputting analysis findings
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self { format, output_path }
    }

    pub fn report(&self, items: &[DeadCodeItem]) -> Result<()> {
        let diagnostics: Vec<Diagnostic> = items.iter().map(Diagnostic::from).collect();
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new().report(&diagnostics),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(&diagnostics),
        }
    }
}
