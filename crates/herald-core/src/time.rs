use crate::error::{CoreError, Result};
use time::OffsetDateTime;

/// Epoch-millisecond timestamp as carried on notification events.
pub type EpochMillis = i64;

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> EpochMillis {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as EpochMillis
}

/// Convert an epoch-millisecond timestamp to an `OffsetDateTime`.
pub fn millis_to_datetime(ms: EpochMillis) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
        .map_err(|e| CoreError::invalid_timestamp(format!("{ms}: {e}")))
}

/// Render an epoch-millisecond timestamp as RFC 3339 for display and logs.
pub fn millis_to_rfc3339(ms: EpochMillis) -> Result<String> {
    let dt = millis_to_datetime(ms)?;
    dt.format(&time::format_description::well_known::Rfc3339)
        .map_err(|e| CoreError::invalid_timestamp(format!("{ms}: {e}")))
}
