use super::{AllowlistConfig, Config};
use crate::error::ConfigurationError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Component, Path};

fn build_set(patterns: &[String], literal_separator: bool) -> Result<GlobSet, ConfigurationError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(literal_separator)
            .build()
            .map_err(|e| ConfigurationError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigurationError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

/// Glob set over paths relative to the project root
#[derive(Debug, Clone)]
pub struct PathMatcher {
    set: GlobSet,
}

impl PathMatcher {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigurationError> {
        Ok(Self {
            set: build_set(patterns, true)?,
        })
    }

    pub fn is_match(&self, relative: &Path) -> bool {
        self.set.is_match(relative)
    }
}

/// Compiled allowlist: suppressed class names and files
#[derive(Debug, Clone)]
pub struct Allowlist {
    classes: GlobSet,
    files: PathMatcher,
}

impl Allowlist {
    pub fn new(config: &AllowlistConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            classes: build_set(&config.classes, false)?,
            files: PathMatcher::new(&config.files)?,
        })
    }

    pub fn allows_class(&self, name: &str) -> bool {
        self.classes.is_match(name)
    }

    pub fn allows_file(&self, relative: &Path) -> bool {
        self.files.is_match(relative)
    }
}

/// Path rules deciding which files are analyzed, compiled once per run
#[derive(Debug, Clone)]
pub struct ScopeRules {
    pub allowlist: Allowlist,
    pub tests: PathMatcher,
    source_root: String,
    excluded_components: Vec<String>,
    skip_barrel_files: bool,
    global_receivers: HashSet<String>,
}

impl ScopeRules {
    pub fn new(config: &Config) -> Result<Self, ConfigurationError> {
        Ok(Self {
            allowlist: Allowlist::new(&config.allowlist)?,
            tests: PathMatcher::new(&config.test_patterns)?,
            source_root: config.source_root.clone(),
            excluded_components: config.excluded_components.clone(),
            skip_barrel_files: config.skip_barrel_files,
            global_receivers: config.global_receivers.iter().cloned().collect(),
        })
    }

    /// Under the source root, outside excluded components, not allowlisted
    pub fn is_project_source(&self, relative: &Path) -> bool {
        let mut under_root = false;
        for component in relative.components() {
            let Component::Normal(name) = component else {
                continue;
            };
            let Some(name) = name.to_str() else {
                continue;
            };
            if self.excluded_components.iter().any(|c| c == name) {
                return false;
            }
            if name == self.source_root {
                under_root = true;
            }
        }

        under_root && !self.allowlist.allows_file(relative)
    }

    /// `index.ts`, `index.tsx`, ...
    pub fn is_barrel_file(&self, relative: &Path) -> bool {
        self.skip_barrel_files && relative.file_stem().map_or(false, |stem| stem == "index")
    }

    pub fn is_test_file(&self, relative: &Path) -> bool {
        self.tests.is_match(relative)
    }

    pub fn is_global_receiver(&self, name: &str) -> bool {
        self.global_receivers.contains(name)
    }
}
