// One detector per analysis pass, run in the order listed here

mod unresolved_token;
mod phantom_token;
mod dead_class;
mod dead_method;
mod dead_interface_method;
mod dead_function;

pub use unresolved_token::UnresolvedTokenDetector;
pub use phantom_token::PhantomTokenDetector;
pub use dead_class::DeadClassDetector;
pub use dead_method::DeadMethodDetector;
pub use dead_interface_method::DeadInterfaceMethodDetector;
pub use dead_function::DeadFunctionDetector;

use super::{DeadCodeItem, ReferenceClassifier};
use crate::config::{Config, ScopeRules};
use crate::di::{DiGraph, DiGraphBuilder};
use crate::graph::{Declaration, Reference};
use crate::project::ProjectModel;
use std::path::Path;
use tracing::warn;

/// Everything a pass may read; shared by all passes of one run
pub struct AnalysisContext<'a> {
    pub model: &'a ProjectModel,
    pub di: &'a DiGraph,
    pub config: &'a Config,
    pub rules: &'a ScopeRules,
    pub registrations: &'a DiGraphBuilder,
    pub classifier: ReferenceClassifier<'a>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        model: &'a ProjectModel,
        di: &'a DiGraph,
        config: &'a Config,
        rules: &'a ScopeRules,
        registrations: &'a DiGraphBuilder,
    ) -> Self {
        Self {
            model,
            di,
            config,
            rules,
            registrations,
            classifier: ReferenceClassifier::new(model, rules),
        }
    }

    /// Project source that is neither a barrel nor a registration module
    pub fn is_analyzable(&self, file: &Path) -> bool {
        let relative = self.model.relative_path(file);
        self.rules.is_project_source(relative)
            && !self.rules.is_barrel_file(relative)
            && !self.registrations.is_registration_file(file)
    }

    pub fn is_allowlisted_file(&self, file: &Path) -> bool {
        self.rules.allowlist.allows_file(self.model.relative_path(file))
    }

    pub fn is_project_source(&self, file: &Path) -> bool {
        self.rules.is_project_source(self.model.relative_path(file))
    }

    /// `TOKENS.FOO`
    pub fn token_symbol(&self, token: &str) -> String {
        format!("{}.{}", self.config.di.tokens_namespace, token)
    }

    /// References of `decl`, or `None` (logged) when they cannot be computed
    pub fn references(&self, decl: &Declaration) -> Option<Vec<Reference>> {
        match self.model.find_references(decl) {
            Ok(references) => Some(references),
            Err(e) => {
                warn!("Skipping {}: {}", decl.qualified_name, e);
                None
            }
        }
    }

    /// Number of call-sites of `decl`, `None` when it has to be skipped
    pub fn call_sites(&self, decl: &Declaration) -> Option<usize> {
        let references = self.references(decl)?;
        Some(self.classifier.count_call_sites(&references, &decl.id.file))
    }
}

/// Trait for dead code detectors
pub trait Detector: Sync {
    /// Run the detector and return its findings, in declaration order
    fn detect(&self, ctx: &AnalysisContext<'_>) -> Vec<DeadCodeItem>;
}
