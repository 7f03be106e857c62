//! Translation of raw request query parameters into typed query primitives.
//!
//! Parsing is deliberately permissive where a safe default exists
//! (pagination numbers) and loud where none does (sort order). Unknown
//! filter keys are dropped without error.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;

use crate::compose::compose;
use crate::registry::EventFieldRegistry;
use herald_storage::{EventQuery, Pagination, SortOrder, SortSpec};

/// Parameter carrying a single event identifier.
pub const EVENT_ID_TAG: &str = "event_id";
/// Parameter carrying a comma-separated identifier list.
pub const EVENT_ID_LIST_TAG: &str = "event_id_list";
/// Result window start.
pub const FROM_INDEX_TAG: &str = "from_index";
/// Result window size.
pub const MAX_ITEMS_TAG: &str = "max_items";
/// Field to sort by.
pub const SORT_FIELD_TAG: &str = "sort_field";
/// Sort direction, `asc` or `desc`.
pub const SORT_ORDER_TAG: &str = "sort_order";

/// The raw filter subset of a request: only keys known to the field
/// registry, in sorted order for deterministic composition.
pub type RawFilterMap = BTreeMap<String, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Unrecognized sort order '{0}', expected 'asc' or 'desc'")]
    InvalidSortOrder(String),
}

/// Union of `event_id` and the comma-split `event_id_list`. Blank entries
/// are skipped; duplicates collapse.
pub fn parse_event_id_set(params: &HashMap<String, String>) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    if let Some(id) = params.get(EVENT_ID_TAG) {
        let id = id.trim();
        if !id.is_empty() {
            ids.insert(id.to_string());
        }
    }
    if let Some(list) = params.get(EVENT_ID_LIST_TAG) {
        for id in list.split(',') {
            let id = id.trim();
            if !id.is_empty() {
                ids.insert(id.to_string());
            }
        }
    }
    ids
}

/// Read the result window. Missing or non-numeric values fall back to the
/// defaults; negative numbers pass through and are clamped by the store.
pub fn parse_pagination(params: &HashMap<String, String>, default_max_items: i64) -> Pagination {
    let from_index = params
        .get(FROM_INDEX_TAG)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);
    let max_items = params
        .get(MAX_ITEMS_TAG)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default_max_items);
    Pagination::new(from_index, max_items)
}

/// Read the sort specification. A spec is produced only when both
/// `sort_field` and `sort_order` are present; otherwise `None`, and the
/// store applies its default ordering. A present but unrecognized
/// `sort_order` fails the request; there is no safe default for it.
pub fn parse_sort(params: &HashMap<String, String>) -> Result<Option<SortSpec>, SearchError> {
    let order = match params.get(SORT_ORDER_TAG) {
        Some(raw) => {
            Some(SortOrder::parse(raw).ok_or_else(|| SearchError::InvalidSortOrder(raw.clone()))?)
        }
        None => None,
    };
    let field = params.get(SORT_FIELD_TAG).filter(|f| !f.trim().is_empty());
    Ok(match (field, order) {
        (Some(field), Some(order)) => Some(SortSpec::new(field.trim(), order)),
        _ => None,
    })
}

/// Retain only the keys the registry recognizes as filter parameters
/// (registered fields plus the `query`/`text_query` macros).
pub fn extract_raw_filters(
    params: &HashMap<String, String>,
    registry: &EventFieldRegistry,
) -> RawFilterMap {
    params
        .iter()
        .filter(|(key, _)| registry.is_filter_param(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Run the full translation pipeline: parse the typed primitives, compose
/// the filter set, and assemble the descriptor (which enforces identifier
/// precedence over generic filters).
pub fn build_event_query(
    params: &HashMap<String, String>,
    registry: &EventFieldRegistry,
    default_max_items: i64,
) -> Result<EventQuery, SearchError> {
    let event_id_set = parse_event_id_set(params);
    let pagination = parse_pagination(params, default_max_items);
    let sort = parse_sort(params)?;
    let raw_filters = extract_raw_filters(params, registry);
    let filter = compose(&raw_filters, registry);
    tracing::debug!(
        ids = event_id_set.len(),
        from_index = pagination.from_index,
        max_items = pagination.max_items,
        sort = sort.as_ref().map(|s| s.field.as_str()),
        filters = raw_filters.len(),
        "translated event query"
    );
    Ok(EventQuery::build(event_id_set, pagination, sort, filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn id_set_from_single_event_id() {
        let set = parse_event_id_set(&params(&[("event_id", "e1")]));
        assert_eq!(set, ["e1".to_string()].into_iter().collect());
    }

    #[test]
    fn id_set_unions_singleton_and_list() {
        let set = parse_event_id_set(&params(&[
            ("event_id", "e1"),
            ("event_id_list", "e2,e3,e1"),
        ]));
        let expected: BTreeSet<String> =
            ["e1", "e2", "e3"].into_iter().map(String::from).collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn id_set_skips_blank_entries() {
        let set = parse_event_id_set(&params(&[("event_id_list", " a ,, b ,")]));
        let expected: BTreeSet<String> = ["a", "b"].into_iter().map(String::from).collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn id_set_empty_when_neither_present() {
        assert!(parse_event_id_set(&params(&[("event_source.title", "x")])).is_empty());
    }

    #[test]
    fn pagination_defaults_when_missing() {
        let p = parse_pagination(&params(&[]), 1000);
        assert_eq!(p.from_index, 0);
        assert_eq!(p.max_items, 1000);
    }

    #[test]
    fn pagination_defaults_on_non_numeric_input() {
        let p = parse_pagination(
            &params(&[("from_index", "five"), ("max_items", "1e3")]),
            1000,
        );
        assert_eq!(p.from_index, 0);
        assert_eq!(p.max_items, 1000);
    }

    #[test]
    fn pagination_passes_negative_values_through() {
        let p = parse_pagination(&params(&[("from_index", "-5"), ("max_items", "-1")]), 1000);
        assert_eq!(p.from_index, -5);
        assert_eq!(p.max_items, -1);
    }

    #[test]
    fn pagination_reads_explicit_window() {
        let p = parse_pagination(&params(&[("from_index", "5"), ("max_items", "10")]), 1000);
        assert_eq!(p.from_index, 5);
        assert_eq!(p.max_items, 10);
    }

    #[test]
    fn sort_absent_yields_none() {
        assert_eq!(parse_sort(&params(&[])), Ok(None));
    }

    #[test]
    fn sort_field_alone_yields_no_spec() {
        let spec = parse_sort(&params(&[("sort_field", "created_time_ms")])).unwrap();
        assert_eq!(spec, None);
    }

    #[test]
    fn sort_order_alone_yields_no_spec_but_is_still_validated() {
        let spec = parse_sort(&params(&[("sort_order", "desc")])).unwrap();
        assert_eq!(spec, None);
    }

    #[test]
    fn sort_order_tokens_parse() {
        let spec = parse_sort(&params(&[
            ("sort_field", "event_source.severity"),
            ("sort_order", "desc"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(spec.order, SortOrder::Descending);

        let spec = parse_sort(&params(&[
            ("sort_field", "event_source.severity"),
            ("sort_order", "ASC"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(spec.order, SortOrder::Ascending);
    }

    #[test]
    fn bogus_sort_order_fails_loudly() {
        let err = parse_sort(&params(&[("sort_order", "bogus")])).unwrap_err();
        assert_eq!(err, SearchError::InvalidSortOrder("bogus".to_string()));
        // Even without a sort field the bad token is rejected, matching the
        // asymmetry with silently-defaulting pagination.
        assert!(parse_sort(&params(&[("sort_field", "x"), ("sort_order", "sideways")])).is_err());
    }

    #[test]
    fn raw_filters_keep_only_registry_keys() {
        let registry = EventFieldRegistry::standard();
        let raw = extract_raw_filters(
            &params(&[
                ("event_source.severity", "high"),
                ("query", "disk"),
                ("text_query", "disk"),
                ("max_items", "10"),
                ("unknown_field", "x"),
            ]),
            &registry,
        );
        let keys: Vec<&str> = raw.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["event_source.severity", "query", "text_query"]);
    }
}

#[cfg(test)]
mod build_query_tests {
    use super::*;
    use herald_storage::{FieldMatcher, FilterClause};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn registry() -> EventFieldRegistry {
        EventFieldRegistry::standard()
    }

    #[test]
    fn single_id_request_builds_id_lookup_with_default_window() {
        // Scenario: ?event_id=e1
        let query = build_event_query(&params(&[("event_id", "e1")]), &registry(), 1000).unwrap();
        assert_eq!(query.event_id_set.len(), 1);
        assert!(query.event_id_set.contains("e1"));
        assert!(query.filter.is_empty());
        assert_eq!(query.pagination, Pagination::default());
        assert!(query.sort.is_none());
    }

    #[test]
    fn filter_request_builds_keyword_matcher_and_window() {
        // Scenario: ?event_source.severity=high,info&from_index=5&max_items=10
        let query = build_event_query(
            &params(&[
                ("event_source.severity", "high,info"),
                ("from_index", "5"),
                ("max_items", "10"),
            ]),
            &registry(),
            1000,
        )
        .unwrap();
        assert!(query.event_id_set.is_empty());
        assert_eq!(query.pagination, Pagination::new(5, 10));
        assert_eq!(query.filter.clauses.len(), 1);
        match &query.filter.clauses[0] {
            FilterClause::Field { field, matcher } => {
                assert_eq!(field, "event_source.severity");
                let expected: std::collections::BTreeSet<String> =
                    ["high", "info"].into_iter().map(String::from).collect();
                assert_eq!(matcher, &FieldMatcher::Keyword(expected));
            }
            other => panic!("unexpected clause: {other:?}"),
        }
    }

    #[test]
    fn bogus_sort_order_fails_before_any_descriptor_is_built() {
        // Scenario: ?sort_order=bogus
        let err = build_event_query(&params(&[("sort_order", "bogus")]), &registry(), 1000)
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidSortOrder(_)));
    }

    #[test]
    fn id_list_suppresses_generic_filters() {
        // Scenario: ?event_id_list=a,b&event_source.title=ignored
        let query = build_event_query(
            &params(&[
                ("event_id_list", "a,b"),
                ("event_source.title", "ignored"),
            ]),
            &registry(),
            1000,
        )
        .unwrap();
        let expected: BTreeSet<String> = ["a", "b"].into_iter().map(String::from).collect();
        assert_eq!(query.event_id_set, expected);
        assert!(query.filter.is_empty());
    }

    #[test]
    fn even_a_single_id_suppresses_filters() {
        let query = build_event_query(
            &params(&[("event_id", "e1"), ("event_source.severity", "high")]),
            &registry(),
            1000,
        )
        .unwrap();
        assert!(query.filter.is_empty());
    }

    #[test]
    fn no_identifiers_keeps_exactly_the_recognized_filters() {
        let query = build_event_query(
            &params(&[
                ("event_source.severity", "high"),
                ("status_list.config_type", "slack"),
                ("unknown_field", "dropped"),
            ]),
            &registry(),
            1000,
        )
        .unwrap();
        let keys: Vec<&str> = query.filter.addressed_keys().into_iter().collect();
        assert_eq!(keys, vec!["event_source.severity", "status_list.config_type"]);
    }

    #[test]
    fn sort_spec_is_carried_into_the_descriptor() {
        let query = build_event_query(
            &params(&[
                ("sort_field", "last_updated_time_ms"),
                ("sort_order", "desc"),
            ]),
            &registry(),
            1000,
        )
        .unwrap();
        let sort = query.sort.unwrap();
        assert_eq!(sort.field, "last_updated_time_ms");
        assert_eq!(sort.order, SortOrder::Descending);
    }

    #[test]
    fn configured_default_max_items_is_used() {
        let query = build_event_query(&params(&[]), &registry(), 250).unwrap();
        assert_eq!(query.pagination.max_items, 250);
    }
}
