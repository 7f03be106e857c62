//! The narrow read interface a Herald event store implements.

use std::sync::Arc;

use async_trait::async_trait;

use crate::query::{EventQuery, QueryPage};
use herald_core::{NotificationEvent, Result};

/// Read access to stored notification events.
///
/// The trait is intentionally narrow: this service only ever looks events
/// up, it never writes them. Backends own persistence, indexing, default
/// ordering, and the clamping of out-of-range pagination values.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetch a single event by identifier. `Ok(None)` means the id is unknown.
    async fn get_event(&self, event_id: &str) -> Result<Option<NotificationEvent>>;

    /// Execute a query descriptor and return one result window together with
    /// the total hit count.
    async fn search(&self, query: &EventQuery) -> Result<QueryPage>;
}

/// Type alias for a shareable store instance
pub type DynEventStore = Arc<dyn EventStore>;
