use super::Diagnostic;
use crate::analysis::DeadCodeCategory;
use indexmap::IndexMap;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, diagnostics: &[Diagnostic]) -> Result<()> {
        let json = self.render(diagnostics)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            eprintln!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> Result<String> {
        serde_json::to_string_pretty(&JsonReport::new(diagnostics)).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    total_issues: usize,
    issues: &'a [Diagnostic],
    summary: IndexMap<&'static str, usize>,
}

impl<'a> JsonReport<'a> {
    fn new(diagnostics: &'a [Diagnostic]) -> Self {
        // Every category is listed, zero counts included
        let mut summary: IndexMap<&'static str, usize> = DeadCodeCategory::ALL
            .iter()
            .map(|category| (category.slug(), 0))
            .collect();
        for diagnostic in diagnostics {
            *summary.entry(diagnostic.code).or_default() += 1;
        }

        Self {
            version: "1.0",
            total_issues: diagnostics.len(),
            issues: diagnostics,
            summary,
        }
    }
}
