use super::{AnalysisContext, Detector};
use crate::analysis::{DeadCodeCategory, DeadCodeItem};
use crate::graph::{Declaration, DeclarationKind};
use rayon::prelude::*;

/// Method signatures of exported interfaces that nobody calls.
///
/// Barrel and registration files still count here; only the source root,
/// excluded components and the file allowlist narrow the scope.
pub struct DeadInterfaceMethodDetector;

impl DeadInterfaceMethodDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeadInterfaceMethodDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DeadInterfaceMethodDetector {
    fn detect(&self, ctx: &AnalysisContext<'_>) -> Vec<DeadCodeItem> {
        let graph = ctx.model.graph();
        let signatures: Vec<&Declaration> = graph
            .declarations_of_kind(DeclarationKind::Interface)
            .filter(|iface| iface.is_exported && ctx.is_project_source(&iface.location.file))
            .flat_map(|iface| graph.get_children(&iface.id))
            .filter(|member| member.kind == DeclarationKind::InterfaceMethod)
            .collect();

        signatures
            .par_iter()
            .filter_map(|signature| {
                if ctx.call_sites(signature)? > 0 {
                    return None;
                }
                Some(DeadCodeItem::new(
                    DeadCodeCategory::DeadInterfaceMethod,
                    signature.qualified_name.clone(),
                    signature.location.file.clone(),
                    signature.location.line,
                    signature.location.column,
                ))
            })
            .collect()
    }
}
