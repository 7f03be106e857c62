pub mod error;
pub mod event;
pub mod time;

pub use error::{CoreError, ErrorCategory, Result};
pub use event::{
    ConfigType, DeliveryStatus, EmailRecipientStatus, EventSource, EventStatus, NotificationEvent,
    SeverityType,
};
pub use time::{EpochMillis, now_ms};
