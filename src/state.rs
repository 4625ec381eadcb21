//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the runtime config and the session registry, which owns every
//! live board.

use std::sync::Arc;

use crate::config::Config;
use crate::services::registry::SessionRegistry;

/// Shared application state. Clone is required by Axum; both fields are
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: SessionRegistry,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let registry = SessionRegistry::new(config.timing);
        Self { config: Arc::new(config), registry }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;
