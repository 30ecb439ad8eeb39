// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared state handed to every route handler.

use iacgov_config::GovHostConfig;
use iacgov_registry::Dispatcher;

/// State shared across all route handlers and middleware.
pub struct AppState {
    /// Routes requests into the sealed agent registry.
    pub dispatcher: Dispatcher,
    /// Resolved runtime configuration.
    pub config: GovHostConfig,
}

impl AppState {
    /// Build state over a dispatcher and its resolved config.
    #[must_use]
    pub fn new(dispatcher: Dispatcher, config: GovHostConfig) -> Self {
        Self { dispatcher, config }
    }
}
