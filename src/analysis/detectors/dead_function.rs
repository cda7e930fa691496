use super::{AnalysisContext, Detector};
use crate::analysis::{DeadCodeCategory, DeadCodeItem};
use crate::graph::{Declaration, DeclarationKind};
use rayon::prelude::*;

/// Exported function declarations without call-sites (opt-in pass)
pub struct DeadFunctionDetector;

impl DeadFunctionDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeadFunctionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DeadFunctionDetector {
    fn detect(&self, ctx: &AnalysisContext<'_>) -> Vec<DeadCodeItem> {
        let functions: Vec<&Declaration> = ctx
            .model
            .graph()
            .declarations_of_kind(DeclarationKind::Function)
            .filter(|function| function.is_exported && ctx.is_analyzable(&function.location.file))
            .collect();

        functions
            .par_iter()
            .filter_map(|function| {
                if ctx.call_sites(function)? > 0 {
                    return None;
                }
                Some(DeadCodeItem::new(
                    DeadCodeCategory::DeadFunction,
                    function.name.clone(),
                    function.location.file.clone(),
                    function.location.line,
                    function.location.column,
                ))
            })
            .collect()
    }
}
