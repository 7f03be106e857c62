//! Addressable filter-field catalog for notification events.
//!
//! The catalog is fixed at compile time: every field a request may filter
//! on, with its matching semantics, plus the membership of the two
//! cross-field convenience searches. It is built once at process start and
//! shared read-only across requests; nothing mutates it afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pseudo-field spanning every keyword and text field.
pub const QUERY_ALL: &str = "query";
/// Pseudo-field spanning text fields only.
pub const QUERY_TEXT: &str = "text_query";

/// Matching semantics of an addressable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Exact membership in a comma-separated token set.
    Keyword,
    /// Case-insensitive "contains any of" over comma-separated terms.
    Text,
    /// Numeric `from..to` interval with optionally open bounds.
    Range,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword => f.write_str("keyword"),
            Self::Text => f.write_str("text"),
            Self::Range => f.write_str("range"),
        }
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FilterKind,
}

/// The immutable field catalog. Insertion order is the declaration order
/// below, which keeps macro fan-out deterministic.
#[derive(Debug, Clone)]
pub struct EventFieldRegistry {
    fields: IndexMap<&'static str, FilterKind>,
}

impl EventFieldRegistry {
    /// The standard notification-event field set.
    pub fn standard() -> Self {
        use FilterKind::{Keyword, Range, Text};

        let mut fields = IndexMap::new();
        fields.insert("created_time_ms", Range);
        fields.insert("last_updated_time_ms", Range);
        fields.insert("event_source.reference_id", Keyword);
        fields.insert("event_source.severity", Keyword);
        fields.insert("event_source.tags", Text);
        fields.insert("event_source.title", Text);
        fields.insert("status_list.config_id", Keyword);
        fields.insert("status_list.config_type", Keyword);
        fields.insert("status_list.config_name", Text);
        fields.insert("status_list.delivery_status.status_code", Keyword);
        fields.insert("status_list.delivery_status.status_text", Text);
        fields.insert("status_list.email_recipient_status.recipient", Text);
        fields.insert(
            "status_list.email_recipient_status.delivery_status.status_code",
            Keyword,
        );
        fields.insert(
            "status_list.email_recipient_status.delivery_status.status_text",
            Text,
        );
        Self { fields }
    }

    /// Matching semantics of a registered field, `None` for unknown names.
    pub fn kind_of(&self, field: &str) -> Option<FilterKind> {
        self.fields.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Whether a request key addresses a filter: a registered field or one
    /// of the two macro pseudo-fields.
    pub fn is_filter_param(&self, key: &str) -> bool {
        key == QUERY_ALL || key == QUERY_TEXT || self.contains(key)
    }

    /// All registered fields in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = FieldDescriptor> + '_ {
        self.fields
            .iter()
            .map(|(&name, &kind)| FieldDescriptor { name, kind })
    }

    /// Members of the `query` convenience search: every keyword and text field.
    pub fn query_group(&self) -> Vec<FieldDescriptor> {
        self.descriptors()
            .filter(|d| matches!(d.kind, FilterKind::Keyword | FilterKind::Text))
            .collect()
    }

    /// Members of the `text_query` convenience search: text fields only.
    pub fn text_query_group(&self) -> Vec<FieldDescriptor> {
        self.descriptors()
            .filter(|d| d.kind == FilterKind::Text)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for EventFieldRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_kinds() {
        let registry = EventFieldRegistry::standard();
        assert_eq!(registry.len(), 14);
        assert_eq!(
            registry.kind_of("event_source.severity"),
            Some(FilterKind::Keyword)
        );
        assert_eq!(registry.kind_of("event_source.title"), Some(FilterKind::Text));
        assert_eq!(registry.kind_of("created_time_ms"), Some(FilterKind::Range));
        assert_eq!(
            registry.kind_of("status_list.email_recipient_status.delivery_status.status_code"),
            Some(FilterKind::Keyword)
        );
        assert_eq!(registry.kind_of("event_source"), None);
        assert_eq!(registry.kind_of("severity"), None);
    }

    #[test]
    fn macro_keys_are_filter_params_but_not_fields() {
        let registry = EventFieldRegistry::standard();
        assert!(registry.is_filter_param(QUERY_ALL));
        assert!(registry.is_filter_param(QUERY_TEXT));
        assert!(!registry.contains(QUERY_ALL));
        assert!(!registry.contains(QUERY_TEXT));
        assert!(registry.is_filter_param("status_list.config_id"));
        assert!(!registry.is_filter_param("unknown_field"));
    }

    #[test]
    fn query_group_spans_keyword_and_text() {
        let registry = EventFieldRegistry::standard();
        let group = registry.query_group();
        // Everything except the two range fields.
        assert_eq!(group.len(), 12);
        assert!(group.iter().all(|d| d.kind != FilterKind::Range));
        assert!(group.iter().any(|d| d.name == "event_source.severity"));
        assert!(group.iter().any(|d| d.name == "event_source.title"));
    }

    #[test]
    fn text_query_group_spans_text_only() {
        let registry = EventFieldRegistry::standard();
        let group = registry.text_query_group();
        assert_eq!(group.len(), 6);
        assert!(group.iter().all(|d| d.kind == FilterKind::Text));
        assert!(
            group
                .iter()
                .any(|d| d.name == "status_list.email_recipient_status.recipient")
        );
    }

    #[test]
    fn declaration_order_is_stable() {
        let registry = EventFieldRegistry::standard();
        let first: Vec<&str> = registry.descriptors().take(2).map(|d| d.name).collect();
        assert_eq!(first, vec!["created_time_ms", "last_updated_time_ms"]);
    }
}
