use super::{AnalysisContext, Detector};
use crate::analysis::{DeadCodeCategory, DeadCodeItem};
use std::collections::HashSet;

/// Injections of tokens that nothing binds; one finding per token
pub struct PhantomTokenDetector;

impl PhantomTokenDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhantomTokenDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PhantomTokenDetector {
    fn detect(&self, ctx: &AnalysisContext<'_>) -> Vec<DeadCodeItem> {
        let bound = ctx.di.bound_tokens();
        let mut reported = HashSet::new();

        ctx.di
            .resolutions
            .iter()
            .filter(|r| !bound.contains(r.token.as_str()))
            .filter(|r| !ctx.is_allowlisted_file(&r.file))
            .filter(|r| reported.insert(r.token.as_str()))
            .map(|resolution| {
                let symbol = ctx.token_symbol(&resolution.token);
                let detail = format!("{} (referenced but never bound)", symbol);
                DeadCodeItem::new(
                    DeadCodeCategory::PhantomToken,
                    symbol,
                    resolution.file.clone(),
                    resolution.line,
                    1,
                )
                .with_detail(detail)
            })
            .collect()
    }
}
