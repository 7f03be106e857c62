use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use herald_core::{CoreError, NotificationEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// -------------------------
// Error body
// -------------------------

/// Stable JSON error body: `{"error": {"kind": ..., "reason": ...}}`.
///
/// `kind` is machine-readable; `reason` is suitable for direct display.
/// Nothing beyond the reason text leaks to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorInfo {
    pub kind: String,
    pub reason: String,
}

impl ErrorBody {
    pub fn new(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            error: ErrorInfo {
                kind: kind.into(),
                reason: reason.into(),
            },
        }
    }
}

/// High-level API errors mapped to HTTP responses.
///
/// The taxonomy is fixed: bad request input, a missing event on the
/// dedicated lookup route, and failures of the downstream store.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Execution failure: {0}")]
    ExecutionFailure(String),
}

impl ApiError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn execution_failure(msg: impl Into<String>) -> Self {
        Self::ExecutionFailure(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ExecutionFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable kind tag for the error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidArgument(_) => "invalid_argument",
            ApiError::NotFound(_) => "not_found",
            ApiError::ExecutionFailure(_) => "execution_failure",
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        let reason = match self {
            ApiError::InvalidArgument(msg)
            | ApiError::NotFound(msg)
            | ApiError::ExecutionFailure(msg) => msg.clone(),
        };
        ErrorBody::new(self.kind(), reason)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::EventNotFound { .. } => Self::NotFound(err.to_string()),
            _ if err.is_client_error() => Self::InvalidArgument(err.to_string()),
            _ => Self::ExecutionFailure(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match serde_json::to_vec(&self.to_error_body()) {
            Ok(b) => b,
            Err(_) => {
                let fallback = ErrorBody::new("execution_failure", "Serialization failure");
                serde_json::to_vec(&fallback).unwrap_or_else(|_| b"{}".to_vec())
            }
        };

        axum::http::Response::builder()
            .status(status)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(axum::body::Body::from(body))
            .unwrap_or_else(|_| {
                axum::http::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )
                    .body(axum::body::Body::from("{}"))
                    .expect("build fallback response")
            })
    }
}

// -------------------------
// Response envelope
// -------------------------

/// The outward-facing payload of every event lookup: a total hit count and
/// the ordered page of records. Single-id lookups use the same shape with
/// zero or one entries, so callers handle exactly one response form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventListEnvelope {
    pub total_hits: u64,
    pub events: Vec<NotificationEvent>,
}

impl EventListEnvelope {
    /// Wrap a result page, preserving the store's ordering.
    pub fn shape(events: Vec<NotificationEvent>, total_hits: u64) -> Self {
        Self { total_hits, events }
    }

    /// Wrap a single-id lookup result in the list shape.
    pub fn single(event: NotificationEvent) -> Self {
        Self {
            total_hits: 1,
            events: vec![event],
        }
    }

    pub fn empty() -> Self {
        Self {
            total_hits: 0,
            events: Vec::new(),
        }
    }
}

// -------------------------
// API response wrapper
// -------------------------

#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub value: T,
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

impl<T> ApiResponse<T> {
    pub fn new(value: T, status: StatusCode) -> Self {
        Self {
            value,
            status,
            headers: Vec::new(),
        }
    }

    pub fn ok(value: T) -> Self {
        Self::new(value, StatusCode::OK)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec(&self.value) {
            Ok(b) => b,
            Err(_) => serde_json::to_vec(&ErrorBody::new(
                "execution_failure",
                "Serialization failure",
            ))
            .unwrap_or_else(|_| b"{}".to_vec()),
        };
        let mut builder = axum::http::Response::builder().status(self.status).header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (n, v) in self.headers.into_iter() {
            builder = builder.header(n, v);
        }
        builder
            .body(axum::body::Body::from(body))
            .unwrap_or_else(|_| {
                axum::http::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )
                    .body(axum::body::Body::from("{}"))
                    .expect("build fallback response")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::{DeliveryStatus, EventSource, EventStatus, SeverityType};

    fn sample_event() -> NotificationEvent {
        NotificationEvent::new(
            "ev-1",
            EventSource::new("ref-1", "sample").with_severity(SeverityType::Info),
        )
        .with_status_list(vec![EventStatus::new(
            "cfg-1",
            herald_core::ConfigType::Webhook,
            "hook",
            DeliveryStatus::new("200", "Success"),
        )])
    }

    #[test]
    fn into_response_sets_status_and_content_type() {
        let resp = ApiError::invalid_argument("bad sort order").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
        assert_eq!(content_type, &HeaderValue::from_static("application/json"));
    }

    #[test]
    fn api_error_variants_map_to_status_and_kinds() {
        let cases: Vec<(ApiError, StatusCode, &str)> = vec![
            (
                ApiError::invalid_argument("x"),
                StatusCode::BAD_REQUEST,
                "invalid_argument",
            ),
            (ApiError::not_found("x"), StatusCode::NOT_FOUND, "not_found"),
            (
                ApiError::execution_failure("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "execution_failure",
            ),
        ];
        for (err, status, kind) in cases.into_iter() {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.kind(), kind);
            assert_eq!(err.to_error_body().error.kind, kind);
        }
    }

    #[test]
    fn error_body_carries_reason_verbatim() {
        let err = ApiError::not_found("notification event 'e9' not found");
        let body = err.to_error_body();
        assert_eq!(body.error.reason, "notification event 'e9' not found");
    }

    #[test]
    fn core_errors_map_into_the_taxonomy() {
        let err: ApiError = CoreError::event_not_found("e1").into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = CoreError::invalid_severity("urgent").into();
        assert!(matches!(err, ApiError::InvalidArgument(_)));

        let err: ApiError = CoreError::execution_failure("store down").into();
        assert!(matches!(err, ApiError::ExecutionFailure(_)));
    }

    #[test]
    fn envelope_shapes_preserve_order_and_count() {
        let a = sample_event();
        let mut b = sample_event();
        b.event_id = "ev-2".to_string();
        let envelope = EventListEnvelope::shape(vec![a.clone(), b.clone()], 10);
        assert_eq!(envelope.total_hits, 10);
        assert_eq!(envelope.events[0], a);
        assert_eq!(envelope.events[1], b);
    }

    #[test]
    fn single_and_empty_use_the_same_shape() {
        let single = EventListEnvelope::single(sample_event());
        assert_eq!(single.total_hits, 1);
        assert_eq!(single.events.len(), 1);

        let empty = EventListEnvelope::empty();
        assert_eq!(empty.total_hits, 0);
        assert!(empty.events.is_empty());

        // Same serialized field set either way.
        let single_json = serde_json::to_value(&single).unwrap();
        let empty_json = serde_json::to_value(&empty).unwrap();
        assert!(single_json.get("total_hits").is_some());
        assert!(empty_json.get("total_hits").is_some());
        assert!(empty_json.get("events").unwrap().as_array().unwrap().is_empty());
    }

    #[test]
    fn api_response_ok_sets_status_and_content_type() {
        let resp = ApiResponse::ok(EventListEnvelope::empty()).into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            &HeaderValue::from_static("application/json")
        );
    }

    #[test]
    fn api_response_can_add_headers() {
        let resp = ApiResponse::ok(EventListEnvelope::empty())
            .with_header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .into_response();
        assert_eq!(
            resp.headers().get(header::CACHE_CONTROL).unwrap(),
            &HeaderValue::from_static("no-store")
        );
    }
}
