use std::sync::Arc;

use crate::{auth::AdminGate, config::Settings, store::Store};

/// Shared, read-only handler context. Cloned into every actix worker.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<dyn Store>,
    pub admin: AdminGate,
}

impl AppState {
    pub fn new(settings: Settings, store: Arc<dyn Store>, admin: AdminGate) -> Self {
        Self {
            settings: Arc::new(settings),
            store,
            admin,
        }
    }

    pub fn upload_bucket(&self) -> &str {
        &self.settings.store.upload_bucket
    }
}
