use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid request configuration for {field} ({value:?}): {reason}")]
    InvalidRequestConfiguration {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("Failed to decode {schema}: {source}")]
    Decode {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{schema} violates its schema: {reason}")]
    SchemaViolation {
        schema: &'static str,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Transport,
    Decode,
    Cancellation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FetchError {
    pub fn invalid_request(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRequestConfiguration {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRequestConfiguration { .. } | Self::ConfigError { .. } => {
                ErrorCategory::Configuration
            }
            Self::Transport(_) | Self::HttpStatus { .. } | Self::Timeout { .. } => {
                ErrorCategory::Transport
            }
            Self::Decode { .. } | Self::SchemaViolation { .. } => ErrorCategory::Decode,
            Self::Cancelled => ErrorCategory::Cancellation,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled => ErrorSeverity::Low,
            Self::Transport(_) | Self::HttpStatus { .. } | Self::Timeout { .. } => {
                ErrorSeverity::Medium
            }
            Self::Decode { .. }
            | Self::SchemaViolation { .. }
            | Self::InvalidRequestConfiguration { .. }
            | Self::ConfigError { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Transport-level failures are worth trying again later; nothing in this
    /// crate retries on its own.
    pub fn is_transient(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidRequestConfiguration { field, reason, .. } => {
                format!("The request could not be built ({}): {}", field, reason)
            }
            Self::Transport(_) => "Could not reach the data service".to_string(),
            Self::HttpStatus { status, .. } => {
                format!("The data service answered with status {}", status)
            }
            Self::Timeout { timeout, .. } => {
                format!("The data service did not answer within {:?}", timeout)
            }
            Self::Cancelled => "The request was cancelled".to_string(),
            Self::Decode { schema, .. } | Self::SchemaViolation { schema, .. } => {
                format!("The service returned data that is not a valid {}", schema)
            }
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::IoError(e) => format!("File system error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidRequestConfiguration { .. } => {
                "Check the base URL, endpoint and request parameters"
            }
            Self::Transport(_) => "Check your network connection and try again",
            Self::HttpStatus { status, .. } if *status == 404 => {
                "Check that the requested country or resource exists"
            }
            Self::HttpStatus { .. } => "The service may be unavailable, try again later",
            Self::Timeout { .. } => "Try again later or raise http.timeout_seconds",
            Self::Cancelled => "Run the command again to retry",
            Self::Decode { .. } | Self::SchemaViolation { .. } => {
                "Verify that the endpoint serves the expected response format"
            }
            Self::ConfigError { .. } => "Fix the configuration file and try again",
            Self::IoError(_) => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
