use crate::error::{CoreError, Result};
use crate::time::{EpochMillis, now_ms};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity assigned by the producer of a notification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeverityType {
    #[default]
    None,
    Info,
    High,
    Critical,
}

impl SeverityType {
    /// Parse a severity from its wire tag.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "info" => Some(Self::Info),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    /// The wire tag for this severity.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Info => "info",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for SeverityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SeverityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| CoreError::invalid_severity(s))
    }
}

/// Delivery channel type of a notification config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigType {
    Slack,
    Chime,
    MicrosoftTeams,
    Webhook,
    Email,
    EmailGroup,
    SmtpAccount,
    SesAccount,
    Sns,
}

impl ConfigType {
    /// Parse a channel type from its wire tag.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "slack" => Some(Self::Slack),
            "chime" => Some(Self::Chime),
            "microsoft_teams" => Some(Self::MicrosoftTeams),
            "webhook" => Some(Self::Webhook),
            "email" => Some(Self::Email),
            "email_group" => Some(Self::EmailGroup),
            "smtp_account" => Some(Self::SmtpAccount),
            "ses_account" => Some(Self::SesAccount),
            "sns" => Some(Self::Sns),
            _ => None,
        }
    }

    /// The wire tag for this channel type.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Slack => "slack",
            Self::Chime => "chime",
            Self::MicrosoftTeams => "microsoft_teams",
            Self::Webhook => "webhook",
            Self::Email => "email",
            Self::EmailGroup => "email_group",
            Self::SmtpAccount => "smtp_account",
            Self::SesAccount => "ses_account",
            Self::Sns => "sns",
        }
    }

    /// Channel types that carry per-recipient email statuses.
    pub fn is_email(&self) -> bool {
        matches!(self, Self::Email | Self::EmailGroup | Self::SmtpAccount | Self::SesAccount)
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ConfigType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| CoreError::invalid_config_type(s))
    }
}

/// Outcome of one delivery attempt: an HTTP-style status code plus text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStatus {
    pub status_code: String,
    pub status_text: String,
}

impl DeliveryStatus {
    pub fn new(status_code: impl Into<String>, status_text: impl Into<String>) -> Self {
        Self {
            status_code: status_code.into(),
            status_text: status_text.into(),
        }
    }
}

/// Per-recipient delivery outcome for email-type channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecipientStatus {
    pub recipient: String,
    pub delivery_status: DeliveryStatus,
}

impl EmailRecipientStatus {
    pub fn new(recipient: impl Into<String>, delivery_status: DeliveryStatus) -> Self {
        Self {
            recipient: recipient.into(),
            delivery_status,
        }
    }
}

/// Delivery outcome for one configured channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStatus {
    pub config_id: String,
    pub config_type: ConfigType,
    pub config_name: String,
    pub delivery_status: DeliveryStatus,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub email_recipient_status: Vec<EmailRecipientStatus>,
}

impl EventStatus {
    pub fn new(
        config_id: impl Into<String>,
        config_type: ConfigType,
        config_name: impl Into<String>,
        delivery_status: DeliveryStatus,
    ) -> Self {
        Self {
            config_id: config_id.into(),
            config_type,
            config_name: config_name.into(),
            delivery_status,
            email_recipient_status: Vec::new(),
        }
    }

    pub fn with_recipients(mut self, recipients: Vec<EmailRecipientStatus>) -> Self {
        self.email_recipient_status = recipients;
        self
    }
}

/// Origin of a notification event: what triggered it and how it was labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSource {
    pub reference_id: String,
    pub severity: SeverityType,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    pub title: String,
}

impl EventSource {
    pub fn new(reference_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            severity: SeverityType::default(),
            tags: Vec::new(),
            title: title.into(),
        }
    }

    pub fn with_severity(mut self, severity: SeverityType) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Audit record of a notification delivery attempt and its per-channel outcomes.
///
/// Records are owned by the event store; this crate never mutates one after
/// construction. Timestamps are epoch milliseconds, matching the wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub event_id: String,
    pub created_time_ms: EpochMillis,
    pub last_updated_time_ms: EpochMillis,
    pub event_source: EventSource,
    pub status_list: Vec<EventStatus>,
}

impl NotificationEvent {
    /// Create an event stamped with the current time.
    pub fn new(event_id: impl Into<String>, event_source: EventSource) -> Self {
        let now = now_ms();
        Self {
            event_id: event_id.into(),
            created_time_ms: now,
            last_updated_time_ms: now,
            event_source,
            status_list: Vec::new(),
        }
    }

    pub fn with_timestamps(mut self, created_ms: EpochMillis, updated_ms: EpochMillis) -> Self {
        self.created_time_ms = created_ms;
        self.last_updated_time_ms = updated_ms;
        self
    }

    pub fn with_status_list(mut self, status_list: Vec<EventStatus>) -> Self {
        self.status_list = status_list;
        self
    }

    /// Validate structural invariants before handing the record out.
    pub fn validate(&self) -> Result<()> {
        if self.event_id.is_empty() {
            return Err(CoreError::invalid_event("event_id must not be empty"));
        }
        if self.status_list.is_empty() {
            return Err(CoreError::invalid_event("status_list must not be empty"));
        }
        for status in &self.status_list {
            if !status.email_recipient_status.is_empty() && !status.config_type.is_email() {
                return Err(CoreError::invalid_event(format!(
                    "config '{}' of type '{}' must not carry email recipient statuses",
                    status.config_id, status.config_type
                )));
            }
        }
        Ok(())
    }
}
