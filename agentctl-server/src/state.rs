//! Shared application state.

use agentctl_core::Db;

/// State handed to every handler: the explicitly constructed persistence
/// handle. Wrapped in an `Arc` by the router.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
}

impl AppState {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}
