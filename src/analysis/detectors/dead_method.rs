use super::{AnalysisContext, Detector};
use crate::analysis::{DeadCodeCategory, DeadCodeItem};
use crate::graph::{Declaration, DeclarationId, DeclarationKind, Visibility};
use rayon::prelude::*;
use std::collections::HashSet;

/// Non-private class methods without call-sites.
///
/// Classes already reported as dead are skipped so a symbol lands in one
/// category only. Methods the runtime or a base class calls for us
/// (abstract overrides, interface implementations) are never reported.
pub struct DeadMethodDetector {
    dead_classes: HashSet<DeclarationId>,
}

impl DeadMethodDetector {
    pub fn new(dead_classes: HashSet<DeclarationId>) -> Self {
        Self { dead_classes }
    }

    fn is_candidate(&self, ctx: &AnalysisContext<'_>, class: &Declaration) -> bool {
        !class.name.is_empty()
            && !self.dead_classes.contains(&class.id)
            && ctx.is_analyzable(&class.location.file)
            && !ctx.rules.allowlist.allows_class(&class.name)
    }

    fn check(&self, ctx: &AnalysisContext<'_>, method: &Declaration) -> Option<DeadCodeItem> {
        if method.visibility == Visibility::Private {
            return None;
        }
        if ctx.classifier.is_abstract_override(method)
            || ctx.classifier.is_interface_implementation(method)
        {
            return None;
        }
        if ctx.call_sites(method)? > 0 {
            return None;
        }

        Some(DeadCodeItem::new(
            DeadCodeCategory::DeadMethod,
            method.qualified_name.clone(),
            method.location.file.clone(),
            method.location.line,
            method.location.column,
        ))
    }
}

impl Detector for DeadMethodDetector {
    fn detect(&self, ctx: &AnalysisContext<'_>) -> Vec<DeadCodeItem> {
        let graph = ctx.model.graph();
        let methods: Vec<&Declaration> = graph
            .declarations_of_kind(DeclarationKind::Class)
            .filter(|class| self.is_candidate(ctx, class))
            .flat_map(|class| graph.get_children(&class.id))
            .filter(|member| member.kind == DeclarationKind::Method)
            .collect();

        methods
            .par_iter()
            .filter_map(|method| self.check(ctx, method))
            .collect()
    }
}
