use thiserror::Error;

/// Core error types for Herald operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),

    #[error("Invalid channel type: {0}")]
    InvalidConfigType(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid event data: {message}")]
    InvalidEvent { message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Notification event not found: {id}")]
    EventNotFound { id: String },

    #[error("Query execution failure: {message}")]
    ExecutionFailure { message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Create a new InvalidSeverity error
    pub fn invalid_severity(severity: impl Into<String>) -> Self {
        Self::InvalidSeverity(severity.into())
    }

    /// Create a new InvalidConfigType error
    pub fn invalid_config_type(config_type: impl Into<String>) -> Self {
        Self::InvalidConfigType(config_type.into())
    }

    /// Create a new InvalidTimestamp error
    pub fn invalid_timestamp(timestamp: impl Into<String>) -> Self {
        Self::InvalidTimestamp(timestamp.into())
    }

    /// Create a new InvalidEvent error
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    /// Create a new EventNotFound error
    pub fn event_not_found(id: impl Into<String>) -> Self {
        Self::EventNotFound { id: id.into() }
    }

    /// Create a new ExecutionFailure error
    pub fn execution_failure(message: impl Into<String>) -> Self {
        Self::ExecutionFailure {
            message: message.into(),
        }
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSeverity(_)
                | Self::InvalidConfigType(_)
                | Self::InvalidTimestamp(_)
                | Self::InvalidEvent { .. }
                | Self::EventNotFound { .. }
                | Self::JsonError(_)
        )
    }

    /// Check if this error is a server error (5xx category)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ExecutionFailure { .. } | Self::Configuration(_))
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSeverity(_)
            | Self::InvalidConfigType(_)
            | Self::InvalidTimestamp(_)
            | Self::InvalidEvent { .. } => ErrorCategory::Validation,
            Self::EventNotFound { .. } => ErrorCategory::NotFound,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::ExecutionFailure { .. } => ErrorCategory::Execution,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Serialization,
    Execution,
    Configuration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Serialization => write!(f, "serialization"),
            Self::Execution => write!(f, "execution"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
