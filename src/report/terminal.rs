use super::Diagnostic;
use crate::analysis::{DeadCodeCategory, Severity};
use colored::Colorize;
use indexmap::IndexMap;
use miette::Result;
use std::path::Path;

/// Terminal reporter with colored output
pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, diagnostics: &[Diagnostic]) -> Result<()> {
        if diagnostics.is_empty() {
            println!("{}", "No dead code found!".green().bold());
            return Ok(());
        }

        // Group by file, files in first-seen order
        let mut by_file: IndexMap<&Path, Vec<&Diagnostic>> = IndexMap::new();
        for diagnostic in diagnostics {
            by_file.entry(diagnostic.file.as_path()).or_default().push(diagnostic);
        }

        println!();
        println!(
            "{}",
            format!("Found {} dead code issues:", diagnostics.len())
                .yellow()
                .bold()
        );
        println!();

        for (file, items) in &by_file {
            println!("{}", file.display().to_string().cyan().bold());
            for item in items {
                self.print_item(item);
            }
            println!();
        }

        self.print_summary(diagnostics);
        Ok(())
    }

    fn print_item(&self, item: &Diagnostic) {
        let severity = match item.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };
        let location = format!("{}:{}", item.line, item.column);

        println!(
            "  {} {} [{}] {}",
            location.dimmed(),
            severity,
            item.code.dimmed(),
            item.message
        );

        if let Some(detail) = &item.detail {
            println!("    {} {}", "→".dimmed(), detail.white());
        }
    }

    fn print_summary(&self, diagnostics: &[Diagnostic]) {
        println!("{}", "─".repeat(60).dimmed());
        println!("Summary:");

        for category in DeadCodeCategory::ALL {
            let count = diagnostics
                .iter()
                .filter(|d| d.code == category.slug())
                .count();
            if count > 0 {
                println!("  {:<24} {}", category.slug(), count.to_string().yellow());
            }
        }
        println!();
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
