use std::cmp::Ordering;

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use serde_json::Value;

use herald_core::{NotificationEvent, Result};
use herald_storage::query::path_values;
use herald_storage::{EventQuery, EventStore, QueryPage, SortOrder, SortSpec};

/// In-memory event store using a papaya lock-free map, keyed by `event_id`.
///
/// Writes happen through the inherent `insert`; the [`EventStore`] trait
/// surface stays read-only.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: PapayaHashMap<String, NotificationEvent>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: PapayaHashMap::new(),
        }
    }

    /// Insert or replace an event. Later inserts win on id collision.
    pub fn insert(&self, event: NotificationEvent) {
        self.events.pin().insert(event.event_id.clone(), event);
    }

    pub fn count(&self) -> usize {
        self.events.pin().len()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn get_event(&self, event_id: &str) -> Result<Option<NotificationEvent>> {
        let guard = self.events.pin();
        Ok(guard.get(event_id).cloned())
    }

    async fn search(&self, query: &EventQuery) -> Result<QueryPage> {
        let guard = self.events.pin();
        let mut matched: Vec<(Value, NotificationEvent)> = Vec::new();
        for (_, event) in guard.iter() {
            if !query.event_id_set.is_empty() && !query.event_id_set.contains(&event.event_id) {
                continue;
            }
            let doc = serde_json::to_value(event)?;
            if query.filter.matches_doc(&doc) {
                matched.push((doc, event.clone()));
            }
        }

        match &query.sort {
            Some(spec) => sort_matches(&mut matched, spec),
            // Default ordering: newest first, id as the tie-breaker.
            None => matched.sort_by(|(_, a), (_, b)| {
                b.created_time_ms
                    .cmp(&a.created_time_ms)
                    .then_with(|| a.event_id.cmp(&b.event_id))
            }),
        }

        let total_hits = matched.len() as u64;
        // Negative window values pass the parser untouched; clamp them here.
        let from = query.pagination.from_index.max(0) as usize;
        let limit = query.pagination.max_items.max(0) as usize;
        let events = matched
            .into_iter()
            .skip(from)
            .take(limit)
            .map(|(_, event)| event)
            .collect();
        Ok(QueryPage::new(total_hits, events, query.pagination))
    }
}

fn sort_matches(matched: &mut [(Value, NotificationEvent)], spec: &SortSpec) {
    matched.sort_by(|(doc_a, _), (doc_b, _)| {
        let key_a = sort_key(doc_a, &spec.field);
        let key_b = sort_key(doc_b, &spec.field);
        match (key_a, key_b) {
            (None, None) => Ordering::Equal,
            // Records missing the sort field go last in either direction.
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ord = compare_values(a, b);
                match spec.order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            }
        }
    });
}

fn sort_key<'a>(doc: &'a Value, field: &str) -> Option<&'a Value> {
    path_values(doc, field).into_iter().next()
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or(0.0)
            .total_cmp(&y.as_f64().unwrap_or(0.0)),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
