//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::db::FurnitureRepository;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    furniture: FurnitureRepository,
}

impl AppState {
    /// Create the state, opening the catalog named by `config.data_file`.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let furniture = FurnitureRepository::new(config.data_file.clone());
        Self {
            inner: Arc::new(AppStateInner { config, furniture }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the furniture repository.
    #[must_use]
    pub fn furniture(&self) -> &FurnitureRepository {
        &self.inner.furniture
    }
}
