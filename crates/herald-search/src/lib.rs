//! Query-parameter translation for the Herald notification-event API.
//!
//! Turns the bag of string key/value pairs from an inbound request into a
//! validated [`herald_storage::EventQuery`]: identifier set, pagination
//! window, sort specification, and a composed set of per-field filters.

pub mod compose;
pub mod parser;
pub mod registry;

pub use compose::compose;
pub use parser::{
    RawFilterMap, SearchError, build_event_query, extract_raw_filters, parse_event_id_set,
    parse_pagination, parse_sort,
};
pub use registry::{EventFieldRegistry, FieldDescriptor, FilterKind, QUERY_ALL, QUERY_TEXT};
