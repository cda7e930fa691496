mod loader;
mod matcher;

pub use loader::{AllowlistConfig, Config, DetectionConfig, DiConfig};
pub use matcher::{Allowlist, PathMatcher, ScopeRules};
