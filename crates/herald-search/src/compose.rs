//! Filter composition: raw filter strings into typed matchers.
//!
//! Each raw entry becomes one clause built per its registered kind; the
//! `query`/`text_query` macros expand into an OR-group over their
//! registry members, each member using its own matcher semantics against
//! the macro's value. Commas always separate tokens and terms, so a
//! literal comma inside a text value cannot be expressed.

use std::collections::BTreeSet;

use crate::parser::RawFilterMap;
use crate::registry::{EventFieldRegistry, FieldDescriptor, FilterKind, QUERY_ALL, QUERY_TEXT};
use herald_storage::{ComposedFilter, FieldMatcher, FilterClause};

/// Compose the raw filter subset into the typed filter set. Pure; entries
/// with a blank value are dropped, and unparseable range input yields the
/// empty-effect [`FieldMatcher::Never`] rather than an error.
pub fn compose(raw: &RawFilterMap, registry: &EventFieldRegistry) -> ComposedFilter {
    let mut filter = ComposedFilter::empty();
    for (key, value) in raw {
        if value.trim().is_empty() {
            continue;
        }
        match key.as_str() {
            QUERY_ALL => filter.push(FilterClause::any_of(
                QUERY_ALL,
                expand_group(registry.query_group(), value),
            )),
            QUERY_TEXT => filter.push(FilterClause::any_of(
                QUERY_TEXT,
                expand_group(registry.text_query_group(), value),
            )),
            field => {
                if let Some(kind) = registry.kind_of(field) {
                    filter.push(FilterClause::field(field, matcher_for(kind, value)));
                }
            }
        }
    }
    filter
}

/// Build one matcher according to the field's registered kind.
pub fn matcher_for(kind: FilterKind, value: &str) -> FieldMatcher {
    match kind {
        FilterKind::Keyword => FieldMatcher::Keyword(split_tokens(value)),
        FilterKind::Text => FieldMatcher::Text(split_terms(value)),
        FilterKind::Range => parse_range(value),
    }
}

fn expand_group(group: Vec<FieldDescriptor>, value: &str) -> Vec<(String, FieldMatcher)> {
    group
        .into_iter()
        .map(|d| (d.name.to_string(), matcher_for(d.kind, value)))
        .collect()
}

fn split_tokens(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn split_terms(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `from..to` interval syntax. Either side may be absent; a bare
/// number is a lower bound with an open top. Non-numeric bounds produce
/// the never-matching filter.
fn parse_range(value: &str) -> FieldMatcher {
    let (lo, hi) = match value.split_once("..") {
        Some((lo, hi)) => (lo, hi),
        None => (value, ""),
    };
    let from = match parse_bound(lo) {
        Ok(bound) => bound,
        Err(()) => return FieldMatcher::Never,
    };
    let to = match parse_bound(hi) {
        Ok(bound) => bound,
        Err(()) => return FieldMatcher::Never,
    };
    FieldMatcher::Range { from, to }
}

fn parse_bound(raw: &str) -> Result<Option<i64>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>().map(Some).map_err(|_| ())
}
