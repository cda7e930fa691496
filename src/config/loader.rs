use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for deadwire analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classes and files that are never reported
    pub allowlist: AllowlistConfig,

    /// Path component that marks project source (`src`)
    pub source_root: String,

    /// Path components whose files are never analyzed
    pub excluded_components: Vec<String>,

    /// Globs (relative to the project root) for test files; references
    /// from these files are not call-sites
    pub test_patterns: Vec<String>,

    /// Skip `index.*` re-export modules
    pub skip_barrel_files: bool,

    /// Runtime globals whose property accesses (`console.warn`) never
    /// reference a project member
    pub global_receivers: Vec<String>,

    /// Dependency-injection conventions of the analyzed code
    pub di: DiConfig,

    /// Detection configuration
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowlistConfig {
    /// Class name globs (`*Adapter`)
    pub classes: Vec<String>,

    /// File globs relative to the project root (`src/index.ts`)
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiConfig {
    /// Object holding the DI tokens (`TOKENS.Foo`)
    pub tokens_namespace: String,

    /// Single-injection decorators (`@inject(TOKENS.Foo)`)
    pub inject_decorators: Vec<String>,

    /// Multi-injection decorators (`@multiInject(TOKENS.Foo)`)
    pub multi_inject_decorators: Vec<String>,

    /// Container variables (`container.get(TOKENS.Foo)`)
    pub container_names: Vec<String>,

    /// Container lookup methods
    pub lookup_methods: Vec<String>,

    /// Regex matched against file paths to find registration modules
    pub registration_pattern: String,

    /// Tokens consumed through multi-injection that are never reported unresolved
    pub multi_inject_exempt: Vec<String>,

    /// Ignore references in registration modules for classes whose every
    /// binding is unresolved
    pub discount_orphaned_registrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Bindings whose token is never injected
    pub unresolved_tokens: bool,

    /// Injections whose token is never bound
    pub phantom_tokens: bool,

    /// Exported classes without call-sites
    pub dead_classes: bool,

    /// Non-private methods without call-sites
    pub dead_methods: bool,

    /// Interface method signatures that are never called
    pub dead_interface_methods: bool,

    /// Exported functions without call-sites
    pub dead_functions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowlist: AllowlistConfig::default(),
            source_root: "src".to_string(),
            excluded_components: vec!["node_modules".to_string(), "generated".to_string()],
            test_patterns: vec![
                "**/tests/**".to_string(),
                "**/__tests__/**".to_string(),
                "**/*.test.*".to_string(),
                "**/*.spec.*".to_string(),
            ],
            skip_barrel_files: true,
            global_receivers: [
                "console", "Math", "JSON", "Object", "Reflect", "Promise", "process", "window",
                "document",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
            di: DiConfig::default(),
            detection: DetectionConfig::default(),
        }
    }
}

impl Default for DiConfig {
    fn default() -> Self {
        Self {
            tokens_namespace: "TOKENS".to_string(),
            inject_decorators: vec!["inject".to_string()],
            multi_inject_decorators: vec!["multiInject".to_string()],
            container_names: vec!["container".to_string()],
            lookup_methods: vec!["get".to_string()],
            registration_pattern: r"register\w+\.(ts|tsx|mts|cts)$".to_string(),
            multi_inject_exempt: vec!["DIAGNOSTIC_INTEGRATION".to_string()],
            discount_orphaned_registrations: false,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            unresolved_tokens: true,
            phantom_tokens: true,
            dead_classes: true,
            dead_methods: true,
            dead_interface_methods: true,
            dead_functions: false,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let invalid = |message: String| ConfigurationError::InvalidSettings {
            path: path.to_path_buf(),
            message,
        };

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents).map_err(|e| invalid(e.to_string())),
            "toml" => toml::from_str(&contents).map_err(|e| invalid(e.to_string())),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents).map_err(|e| invalid(e.to_string()))
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self, ConfigurationError> {
        let default_names = [
            ".deadwire.yml",
            ".deadwire.yaml",
            ".deadwire.toml",
            "deadwire.yml",
            "deadwire.yaml",
            "deadwire.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }
}
