//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use selections_core::ports::{AccountStore, SelectionStore};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub selections: Arc<dyn SelectionStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the state from a single adapter that provides both ports.
    pub fn from_store<S>(store: Arc<S>, config: Arc<Config>) -> Self
    where
        S: SelectionStore + AccountStore + 'static,
    {
        Self {
            selections: store.clone(),
            accounts: store,
            config,
        }
    }
}
