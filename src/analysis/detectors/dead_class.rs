use super::{AnalysisContext, Detector};
use crate::analysis::{DeadCodeCategory, DeadCodeItem};
use crate::graph::{Declaration, DeclarationId, DeclarationKind};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Exported classes in analyzable files without a single call-site
pub struct DeadClassDetector {
    /// Class name -> tokens bound to it that are never resolved
    orphans: HashMap<String, Vec<String>>,

    /// Classes whose every binding is unresolved; their registration
    /// references are discounted when configured
    fully_orphaned: HashSet<String>,
}

impl DeadClassDetector {
    pub fn new(orphans: HashMap<String, Vec<String>>, fully_orphaned: HashSet<String>) -> Self {
        Self {
            orphans,
            fully_orphaned,
        }
    }

    fn check(&self, ctx: &AnalysisContext<'_>, class: &Declaration) -> Option<DeadCodeItem> {
        let references = ctx.references(class)?;

        let discount = ctx.config.di.discount_orphaned_registrations
            && self.fully_orphaned.contains(&class.name);
        let call_sites = ctx.classifier.count_call_sites_where(&references, &class.id.file, |file| {
            !(discount && ctx.registrations.is_registration_file(file))
        });
        if call_sites > 0 {
            return None;
        }

        let detail = match self.orphans.get(&class.name) {
            Some(tokens) => {
                let tokens: Vec<String> = tokens.iter().map(|t| ctx.token_symbol(t)).collect();
                format!(
                    "{} (bound to unresolved DI token {}, zero call-sites)",
                    class.name,
                    tokens.join(", ")
                )
            }
            None => format!("{} (zero external call-sites)", class.name),
        };

        Some(
            DeadCodeItem::new(
                DeadCodeCategory::DeadClass,
                class.name.clone(),
                class.location.file.clone(),
                class.location.line,
                1,
            )
            .with_detail(detail),
        )
    }

    /// Findings paired with the class they report, for the member passes
    pub fn find(&self, ctx: &AnalysisContext<'_>) -> Vec<(DeclarationId, DeadCodeItem)> {
        let candidates: Vec<&Declaration> = ctx
            .model
            .graph()
            .declarations_of_kind(DeclarationKind::Class)
            .filter(|class| class.is_exported)
            .filter(|class| ctx.is_analyzable(&class.location.file))
            .filter(|class| !ctx.rules.allowlist.allows_class(&class.name))
            .collect();

        candidates
            .par_iter()
            .filter_map(|class| Some((class.id.clone(), self.check(ctx, class)?)))
            .collect()
    }
}

impl Detector for DeadClassDetector {
    fn detect(&self, ctx: &AnalysisContext<'_>) -> Vec<DeadCodeItem> {
        self.find(ctx).into_iter().map(|(_, item)| item).collect()
    }
}
