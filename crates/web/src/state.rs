use std::sync::Arc;

use storage::CompetitionStore;
use storage::directory::RiderDirectory;

/// Shared by every handler; cloning only bumps the reference counts.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CompetitionStore>,
    pub directory: Arc<dyn RiderDirectory>,
}

impl AppState {
    pub fn new(store: Arc<dyn CompetitionStore>, directory: Arc<dyn RiderDirectory>) -> Self {
        Self { store, directory }
    }

    pub fn store(&self) -> &dyn CompetitionStore {
        self.store.as_ref()
    }
}
