use std::sync::Arc;

use herald_search::EventFieldRegistry;
use herald_storage::DynEventStore;

use crate::config::AppConfig;

/// Shared per-process state: the event store, the immutable field catalog,
/// and the request defaults. Cheap to clone; everything inside is shared.
#[derive(Clone)]
pub struct AppState {
    pub store: DynEventStore,
    pub registry: Arc<EventFieldRegistry>,
    pub default_max_items: i64,
}

impl AppState {
    pub fn new(store: DynEventStore, cfg: &AppConfig) -> Self {
        Self {
            store,
            registry: Arc::new(EventFieldRegistry::standard()),
            default_max_items: cfg.search.default_max_items,
        }
    }
}
