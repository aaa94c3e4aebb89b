//! Application state shared across handlers

use crate::config::Settings;
use crate::delegate::SearchDelegate;
use std::sync::Arc;

/// Shared application state.
///
/// Read-only after startup; the delegate is the single long-lived instance
/// every request talks to.
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Deep-search delegate
    pub delegate: Arc<dyn SearchDelegate>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, delegate: Arc<dyn SearchDelegate>) -> Self {
        Self {
            settings: Arc::new(settings),
            delegate,
        }
    }
}
