use super::ProjectModel;
use crate::error::ConfigurationError;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

type Slot = Arc<OnceCell<Arc<ProjectModel>>>;

/// Loads project models, caching one per config path.
///
/// At most one load runs per path; concurrent callers for the same path
/// wait on that load and share its result. A failed load is not cached.
#[derive(Default)]
pub struct ProjectLoader {
    cache: Mutex<HashMap<PathBuf, Slot>>,
}

impl ProjectLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, config_path: &Path) -> Result<Arc<ProjectModel>, ConfigurationError> {
        let key = std::fs::canonicalize(config_path).map_err(|_| ConfigurationError::NotFound {
            path: config_path.to_path_buf(),
        })?;

        // The map lock is only held to fetch the slot, never during a load
        let slot = Arc::clone(self.cache.lock().entry(key.clone()).or_default());

        let mut loaded = false;
        let model = slot.get_or_try_init(|| {
            loaded = true;
            ProjectModel::load(&key).map(Arc::new)
        })?;

        if !loaded {
            debug!("Project cache hit: {}", key.display());
        }

        Ok(Arc::clone(model))
    }

    /// Drop the cached model for a config path; returns whether one existed
    pub fn invalidate(&self, config_path: &Path) -> bool {
        let key = std::fs::canonicalize(config_path).unwrap_or_else(|_| config_path.to_path_buf());
        self.cache.lock().remove(&key).is_some()
    }

    /// Number of config paths with a loaded model
    pub fn cached_models(&self) -> usize {
        self.cache
            .lock()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }
}
