use super::{AnalysisContext, Detector};
use crate::analysis::{DeadCodeCategory, DeadCodeItem};
use crate::di::{DiBinding, DiGraph};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Bindings whose token is never injected anywhere
pub struct UnresolvedTokenDetector {
    exempt: HashSet<String>,
}

impl UnresolvedTokenDetector {
    pub fn new(exempt: &[String]) -> Self {
        Self {
            exempt: exempt.iter().cloned().collect(),
        }
    }

    /// Unresolved bindings, skipping files for which `allowlisted` holds
    pub fn unresolved_bindings<'g>(
        &self,
        di: &'g DiGraph,
        allowlisted: impl Fn(&Path) -> bool,
    ) -> Vec<&'g DiBinding> {
        let resolved = di.resolved_tokens();
        di.bindings
            .iter()
            .filter(|b| !resolved.contains(b.token.as_str()) && !self.exempt.contains(&b.token))
            .filter(|b| !allowlisted(&b.file))
            .collect()
    }

    /// Class name -> its unresolved tokens, in binding order
    pub fn orphaned_classes(
        &self,
        di: &DiGraph,
        allowlisted: impl Fn(&Path) -> bool,
    ) -> HashMap<String, Vec<String>> {
        let mut orphans: HashMap<String, Vec<String>> = HashMap::new();
        for binding in self.unresolved_bindings(di, allowlisted) {
            let tokens = orphans.entry(binding.class_name.clone()).or_default();
            if !tokens.contains(&binding.token) {
                tokens.push(binding.token.clone());
            }
        }
        orphans
    }

    /// Classes bound only through unresolved tokens
    pub fn fully_orphaned_classes(
        &self,
        di: &DiGraph,
        allowlisted: impl Fn(&Path) -> bool,
    ) -> HashSet<String> {
        let unresolved: HashSet<(&str, &str)> = self
            .unresolved_bindings(di, allowlisted)
            .into_iter()
            .map(|b| (b.token.as_str(), b.class_name.as_str()))
            .collect();

        di.bindings
            .iter()
            .filter(|b| {
                di.bindings_of(&b.class_name)
                    .all(|other| unresolved.contains(&(other.token.as_str(), other.class_name.as_str())))
            })
            .map(|b| b.class_name.clone())
            .collect()
    }
}

impl Detector for UnresolvedTokenDetector {
    fn detect(&self, ctx: &AnalysisContext<'_>) -> Vec<DeadCodeItem> {
        self.unresolved_bindings(ctx.di, |file| ctx.is_allowlisted_file(file))
            .into_iter()
            .map(|binding| {
                let symbol = ctx.token_symbol(&binding.token);
                let detail = format!("{} → {} (bound but never resolved)", symbol, binding.class_name);
                DeadCodeItem::new(
                    DeadCodeCategory::UnresolvedDiToken,
                    symbol,
                    binding.file.clone(),
                    binding.line,
                    1,
                )
                .with_detail(detail)
            })
            .collect()
    }
}
