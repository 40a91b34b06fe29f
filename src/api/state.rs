//! Application state for shared services

use std::fmt;
use std::sync::Arc;

use crate::domain::VectorStore;
use crate::infrastructure::services::{CompletionOrchestrator, DocumentSeeder};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<CompletionOrchestrator>,
    pub seeder: Arc<DocumentSeeder>,
    pub store: Arc<dyn VectorStore>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("orchestrator", &self.orchestrator)
            .field("seeder", &self.seeder)
            .field("store", &self.store.store_type())
            .finish()
    }
}
