//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone; clones share the same inner state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    /// Held for the whole of a bulk run; the mutation file path is shared.
    bulk_lock: Mutex<()>,
}

impl AppState {
    /// Create application state from server configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                bulk_lock: Mutex::new(()),
            }),
        }
    }

    /// Server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Lock serializing bulk runs.
    #[must_use]
    pub fn bulk_lock(&self) -> &Mutex<()> {
        &self.inner.bulk_lock
    }
}
