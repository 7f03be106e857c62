//! Query descriptor types for notification event lookups.

use herald_core::NotificationEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Default page size when `max_items` is not supplied.
pub const DEFAULT_MAX_ITEMS: i64 = 1000;

/// Sort direction as accepted on the wire (`asc` / `desc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parse a direction token, case-insensitively. Unknown tokens are `None`;
    /// callers decide whether that is an error.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Self::Ascending)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Self::Descending)
        } else {
            None
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => f.write_str("asc"),
            Self::Descending => f.write_str("desc"),
        }
    }
}

/// Requested result ordering. Absent spec means the store applies its own
/// default ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// Result window. Negative values are passed through by the parser and
/// clamped at execution time by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub from_index: i64,
    pub max_items: i64,
}

impl Pagination {
    pub fn new(from_index: i64, max_items: i64) -> Self {
        Self {
            from_index,
            max_items,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            from_index: 0,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

/// Matching semantics applied to a single addressable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldMatcher {
    /// Exact membership in a token set (e.g. `severity=info,high`).
    Keyword(BTreeSet<String>),
    /// Case-insensitive "contains any of" over free-text terms.
    Text(Vec<String>),
    /// Numeric interval over epoch milliseconds; either bound may be open.
    Range { from: Option<i64>, to: Option<i64> },
    /// Matches nothing. Produced for unparseable range input so that a bad
    /// value narrows the result set instead of failing the request.
    Never,
}

impl FieldMatcher {
    /// Evaluate this matcher against one extracted field value.
    ///
    /// Array values (tags, fan-out remnants) match when any element matches.
    pub fn matches_value(&self, value: &Value) -> bool {
        match self {
            Self::Keyword(tokens) => keyword_matches(tokens, value),
            Self::Text(terms) => text_matches(terms, value),
            Self::Range { from, to } => range_matches(*from, *to, value),
            Self::Never => false,
        }
    }
}

fn keyword_matches(tokens: &BTreeSet<String>, value: &Value) -> bool {
    match value {
        Value::String(s) => tokens.contains(s),
        Value::Number(n) => tokens.contains(&n.to_string()),
        Value::Bool(b) => tokens.contains(&b.to_string()),
        Value::Array(items) => items.iter().any(|v| keyword_matches(tokens, v)),
        _ => false,
    }
}

fn text_matches(terms: &[String], value: &Value) -> bool {
    match value {
        Value::String(s) => {
            let haystack = s.to_lowercase();
            terms.iter().any(|t| haystack.contains(&t.to_lowercase()))
        }
        Value::Array(items) => items.iter().any(|v| text_matches(terms, v)),
        _ => false,
    }
}

fn range_matches(from: Option<i64>, to: Option<i64>, value: &Value) -> bool {
    let number = match value {
        Value::Number(n) => match n.as_i64() {
            Some(n) => n,
            None => return false,
        },
        Value::String(s) => match s.parse::<i64>() {
            Ok(n) => n,
            Err(_) => return false,
        },
        Value::Array(items) => return items.iter().any(|v| range_matches(from, to, v)),
        _ => return false,
    };
    if let Some(from) = from
        && number < from
    {
        return false;
    }
    if let Some(to) = to
        && number > to
    {
        return false;
    }
    true
}

/// One AND-composed clause of a filter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterClause {
    /// A matcher scoped to one registered field.
    Field { field: String, matcher: FieldMatcher },
    /// OR-group produced by macro expansion. `key` is the macro parameter
    /// the group was derived from (`query` or `text_query`).
    AnyOf {
        key: String,
        matchers: Vec<(String, FieldMatcher)>,
    },
}

impl FilterClause {
    pub fn field(field: impl Into<String>, matcher: FieldMatcher) -> Self {
        Self::Field {
            field: field.into(),
            matcher,
        }
    }

    pub fn any_of(key: impl Into<String>, matchers: Vec<(String, FieldMatcher)>) -> Self {
        Self::AnyOf {
            key: key.into(),
            matchers,
        }
    }

    /// The request parameter this clause was addressed by.
    pub fn key(&self) -> &str {
        match self {
            Self::Field { field, .. } => field,
            Self::AnyOf { key, .. } => key,
        }
    }

    fn matches_doc(&self, doc: &Value) -> bool {
        match self {
            Self::Field { field, matcher } => path_values(doc, field)
                .iter()
                .any(|v| matcher.matches_value(v)),
            Self::AnyOf { matchers, .. } => matchers.iter().any(|(field, matcher)| {
                path_values(doc, field)
                    .iter()
                    .any(|v| matcher.matches_value(v))
            }),
        }
    }
}

/// The composed set of per-field filters. All clauses must hold (implicit AND);
/// OR only occurs inside a macro-expanded `AnyOf` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposedFilter {
    pub clauses: Vec<FilterClause>,
}

impl ComposedFilter {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn push(&mut self, clause: FilterClause) {
        self.clauses.push(clause);
    }

    /// The set of request parameters this filter addresses. Macro clauses
    /// report their macro key, not their expanded members.
    pub fn addressed_keys(&self) -> BTreeSet<&str> {
        self.clauses.iter().map(FilterClause::key).collect()
    }

    /// Evaluate all clauses against an event's JSON form.
    pub fn matches_doc(&self, doc: &Value) -> bool {
        self.clauses.iter().all(|c| c.matches_doc(doc))
    }

    /// Convenience evaluation against a typed record.
    pub fn matches(&self, event: &NotificationEvent) -> bool {
        match serde_json::to_value(event) {
            Ok(doc) => self.matches_doc(&doc),
            Err(_) => false,
        }
    }
}

/// Collect every value addressed by a dotted path, fanning out over arrays
/// (`status_list.delivery_status.status_code` visits every list entry).
pub fn path_values<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![doc];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => {
                    if let Some(child) = map.get(segment) {
                        next.push(child);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(child) = item.get(segment) {
                            next.push(child);
                        }
                    }
                }
                _ => {}
            }
        }
        current = next;
    }
    current
}

/// The complete, immutable description of one event lookup.
///
/// Built once per request and passed by value to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventQuery {
    pub event_id_set: BTreeSet<String>,
    pub pagination: Pagination,
    pub sort: Option<SortSpec>,
    pub filter: ComposedFilter,
}

impl EventQuery {
    /// Assemble a descriptor, enforcing identifier precedence: a non-empty
    /// identifier set discards all generic filters. The discard is silent by
    /// contract; it is logged at debug level for operators chasing
    /// surprising result sets.
    pub fn build(
        event_id_set: BTreeSet<String>,
        pagination: Pagination,
        sort: Option<SortSpec>,
        filter: ComposedFilter,
    ) -> Self {
        let filter = if event_id_set.is_empty() {
            filter
        } else {
            if !filter.is_empty() {
                tracing::debug!(
                    ids = event_id_set.len(),
                    discarded_clauses = filter.clauses.len(),
                    "identifier lookup takes precedence; generic filters discarded"
                );
            }
            ComposedFilter::empty()
        };
        Self {
            event_id_set,
            pagination,
            sort,
            filter,
        }
    }

    /// Descriptor for a plain identifier lookup.
    pub fn for_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(
            ids.into_iter().map(Into::into).collect(),
            Pagination::default(),
            None,
            ComposedFilter::empty(),
        )
    }

    /// Check whether a record satisfies the identifier set and filters.
    /// Pagination and sort are windowing concerns the store applies.
    pub fn matches(&self, event: &NotificationEvent) -> bool {
        if !self.event_id_set.is_empty() && !self.event_id_set.contains(&event.event_id) {
            return false;
        }
        self.filter.matches(event)
    }
}

/// One page of query results with the total hit count before windowing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPage {
    pub total_hits: u64,
    pub events: Vec<NotificationEvent>,
    pub from_index: i64,
    pub max_items: i64,
}

impl QueryPage {
    pub fn new(total_hits: u64, events: Vec<NotificationEvent>, pagination: Pagination) -> Self {
        Self {
            total_hits,
            events,
            from_index: pagination.from_index,
            max_items: pagination.max_items,
        }
    }

    pub fn empty() -> Self {
        Self {
            total_hits: 0,
            events: Vec::new(),
            from_index: 0,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}
