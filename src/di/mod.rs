//! Dependency-injection wiring extracted from the analyzed project.

mod builder;

pub use builder::DiGraphBuilder;

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// `container.bind(TOKENS.Foo).to(Foo)` in a registration module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiBinding {
    pub token: String,
    pub class_name: String,
    pub file: PathBuf,
    pub line: usize,
}

/// How a token is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionKind {
    /// `@inject(TOKENS.Foo)`
    Inject,
    /// `@multiInject(TOKENS.Foo)`
    MultiInject,
    /// `container.get(TOKENS.Foo)`
    ContainerLookup,
}

/// A site where a token is requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiResolution {
    pub token: String,
    pub file: PathBuf,
    pub line: usize,
    pub kind: ResolutionKind,
}

/// Every binding and resolution of one project snapshot
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiGraph {
    /// In file order, then source order
    pub bindings: Vec<DiBinding>,

    /// In file order, then source order
    pub resolutions: Vec<DiResolution>,
}

impl DiGraph {
    pub fn bound_tokens(&self) -> HashSet<&str> {
        self.bindings.iter().map(|b| b.token.as_str()).collect()
    }

    pub fn resolved_tokens(&self) -> HashSet<&str> {
        self.resolutions.iter().map(|r| r.token.as_str()).collect()
    }

    /// Bindings of `class_name`, in order
    pub fn bindings_of<'a>(&'a self, class_name: &'a str) -> impl Iterator<Item = &'a DiBinding> {
        self.bindings.iter().filter(move |b| b.class_name == class_name)
    }
}
