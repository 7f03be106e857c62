//! Storage abstraction for Herald notification events.
//!
//! Defines the query descriptor handed to an event store and the narrow
//! async read interface a store must implement. Query execution itself is
//! the store's concern; this crate only describes what to execute and can
//! evaluate a descriptor against a single record in process.

pub mod query;
pub mod store;

pub use query::{
    ComposedFilter, DEFAULT_MAX_ITEMS, EventQuery, FieldMatcher, FilterClause, Pagination,
    QueryPage, SortOrder, SortSpec,
};
pub use store::{DynEventStore, EventStore};
