use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;

use herald_api::{ApiError, ApiResponse, EventListEnvelope};
use herald_search::build_event_query;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Herald Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

/// GET `/api/notifications/events`
///
/// Listing form of the lookup: identifier set, pagination, sort, and the
/// registered filter parameters all arrive as query parameters. Repeated
/// keys resolve last-write-wins before they reach the translation layer.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<EventListEnvelope>, ApiError> {
    let query = build_event_query(&params, &state.registry, state.default_max_items)
        .map_err(|e| ApiError::invalid_argument(e.to_string()))?;
    tracing::info!(
        ids = query.event_id_set.len(),
        from_index = query.pagination.from_index,
        max_items = query.pagination.max_items,
        sort_field = query.sort.as_ref().map(|s| s.field.as_str()),
        filters = query.filter.clauses.len(),
        "get notification events"
    );
    let page = state.store.search(&query).await?;
    Ok(ApiResponse::ok(EventListEnvelope::shape(
        page.events,
        page.total_hits,
    )))
}

/// GET `/api/notifications/events/{event_id}`
///
/// Single lookup. Returns the same envelope shape as the listing form so
/// callers handle one response shape; a missing id is a 404 here, unlike
/// the listing route where it is just an empty result.
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<ApiResponse<EventListEnvelope>, ApiError> {
    tracing::info!(%event_id, "get notification event");
    match state.store.get_event(&event_id).await? {
        Some(event) => Ok(ApiResponse::ok(EventListEnvelope::single(event))),
        None => Err(ApiError::not_found(format!(
            "notification event '{event_id}' not found"
        ))),
    }
}
