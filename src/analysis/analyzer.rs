use super::detectors::{
    AnalysisContext, DeadClassDetector, DeadFunctionDetector, DeadInterfaceMethodDetector,
    DeadMethodDetector, Detector, PhantomTokenDetector, UnresolvedTokenDetector,
};
use super::{DeadCodeCategory, DeadCodeItem};
use crate::config::{Config, ScopeRules};
use crate::di::DiGraphBuilder;
use crate::error::ConfigurationError;
use crate::project::{ProjectLoader, ProjectModel};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Runs every enabled pass over a project and returns the findings in pass order
pub struct DeadCodeAnalyzer {
    config: Config,
    rules: ScopeRules,
    registrations: DiGraphBuilder,
    loader: ProjectLoader,
}

impl DeadCodeAnalyzer {
    pub fn new(config: Config) -> Result<Self, ConfigurationError> {
        let rules = ScopeRules::new(&config)?;
        let registrations = DiGraphBuilder::new(&config.di)?;
        Ok(Self {
            config,
            rules,
            registrations,
            loader: ProjectLoader::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load (or reuse) the model for `config_path` and analyze it
    pub fn analyze(&self, config_path: &Path) -> Result<Vec<DeadCodeItem>, ConfigurationError> {
        let model = self.loader.load(config_path)?;
        Ok(self.analyze_model(&model))
    }

    pub fn analyze_model(&self, model: &ProjectModel) -> Vec<DeadCodeItem> {
        let start = Instant::now();
        let detection = &self.config.detection;

        let di = self.registrations.build(model);
        info!(
            "DI graph: {} bindings, {} resolutions",
            di.bindings.len(),
            di.resolutions.len()
        );

        let ctx = AnalysisContext::new(model, &di, &self.config, &self.rules, &self.registrations);
        let mut items = Vec::new();

        // Built even when disabled; the dead-class pass reads its orphans
        let unresolved = UnresolvedTokenDetector::new(&self.config.di.multi_inject_exempt);
        if detection.unresolved_tokens {
            run_pass(&unresolved, &ctx, DeadCodeCategory::UnresolvedDiToken, &mut items);
        }

        if detection.phantom_tokens {
            run_pass(&PhantomTokenDetector::new(), &ctx, DeadCodeCategory::PhantomToken, &mut items);
        }

        let mut dead_classes = HashSet::new();
        if detection.dead_classes {
            let allowlisted = |file: &Path| ctx.is_allowlisted_file(file);
            let detector = DeadClassDetector::new(
                unresolved.orphaned_classes(&di, allowlisted),
                unresolved.fully_orphaned_classes(&di, allowlisted),
            );
            let found = detector.find(&ctx);
            debug!("{}: {} findings", DeadCodeCategory::DeadClass, found.len());
            for (id, item) in found {
                dead_classes.insert(id);
                items.push(item);
            }
        }

        if detection.dead_methods {
            let detector = DeadMethodDetector::new(dead_classes);
            run_pass(&detector, &ctx, DeadCodeCategory::DeadMethod, &mut items);
        }

        if detection.dead_interface_methods {
            let detector = DeadInterfaceMethodDetector::new();
            run_pass(&detector, &ctx, DeadCodeCategory::DeadInterfaceMethod, &mut items);
        }

        if detection.dead_functions {
            run_pass(&DeadFunctionDetector::new(), &ctx, DeadCodeCategory::DeadFunction, &mut items);
        }

        info!(
            "Analysis complete: {} findings in {:.2?}",
            items.len(),
            start.elapsed()
        );
        items
    }
}

fn run_pass(
    detector: &dyn Detector,
    ctx: &AnalysisContext<'_>,
    category: DeadCodeCategory,
    items: &mut Vec<DeadCodeItem>,
) {
    let found = detector.detect(ctx);
    debug!("{}: {} findings", category, found.len());
    items.extend(found);
}
