//! Error types for the docrelay client
//!
//! Every failure surfaced by the transport or the polling engine is a
//! [`ClientError`]. Whatever the variant, callers can read the same shape
//! from it: a stable machine code, a message, and when known the HTTP
//! status, structured details and the ID of the task that failed.

use docrelay_core::config::ConfigError;
use docrelay_core::domain::task::ErrorInfo;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Code used when a FAILED task carries no error code
pub const TASK_FAILED: &str = "TASK_FAILED";
/// Code used when polling runs past its deadline
pub const TASK_TIMEOUT: &str = "TASK_TIMEOUT";
/// Code used when polling is cancelled by the caller
pub const CANCELLED: &str = "CANCELLED";
/// Code used when a request times out at the HTTP layer
pub const TIMEOUT: &str = "TIMEOUT";
/// Code used when a request never produced a response
pub const REQUEST_FAILED: &str = "REQUEST_FAILED";
/// Code used when a success response has an unreadable body
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";
/// Code used for configuration errors
pub const INVALID_CONFIG: &str = "INVALID_CONFIG";

/// Errors that can occur when using the docrelay client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status
    #[error("{message}")]
    Api {
        code: String,
        message: String,
        status: u16,
        details: Option<JsonValue>,
    },

    /// The request did not produce a response
    #[error("{message}")]
    Request {
        code: &'static str,
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// A success response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The remote task reached FAILED
    #[error("{message}")]
    TaskFailed {
        task_id: String,
        code: String,
        message: String,
        details: Option<JsonValue>,
    },

    /// The remote task did not finish before the deadline
    #[error("Task {task_id} did not complete within {}ms", .timeout.as_millis())]
    TaskTimeout { task_id: String, timeout: Duration },

    /// Polling was cancelled by the caller
    #[error("Task {task_id} was cancelled while waiting for completion")]
    Cancelled { task_id: String },

    /// The client configuration is unusable
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// Optional error body of a non-success response
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<JsonValue>,
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
            status,
            details: None,
        }
    }

    /// Build the error for a non-success response from its raw body
    ///
    /// The body may carry `{ code, message, details }`. Anything that is not
    /// such a JSON object, including an empty body, falls back to
    /// `HTTP_<status>` and a generic message.
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

        Self::Api {
            code: parsed.code.unwrap_or_else(|| format!("HTTP_{}", status)),
            message: parsed
                .message
                .unwrap_or_else(|| format!("API request failed with status {}", status)),
            status,
            details: parsed.details,
        }
    }

    /// Classify a reqwest failure
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Request {
                code: TIMEOUT,
                message: format!("Request timeout: {}", err),
                source: err,
            }
        } else {
            Self::Request {
                code: REQUEST_FAILED,
                message: format!("Request failed: {}", err),
                source: err,
            }
        }
    }

    /// Build the error for a task that reached FAILED
    pub fn task_failed(task_id: impl Into<String>, error: Option<ErrorInfo>) -> Self {
        let error = error.unwrap_or_default();
        Self::TaskFailed {
            task_id: task_id.into(),
            code: error.code.unwrap_or_else(|| TASK_FAILED.to_string()),
            message: error
                .message
                .unwrap_or_else(|| "Task failed without error details".to_string()),
            details: error.details,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &str {
        match self {
            Self::Api { code, .. } | Self::TaskFailed { code, .. } => code.as_str(),
            Self::Request { code, .. } => code,
            Self::InvalidResponse(_) => INVALID_RESPONSE,
            Self::TaskTimeout { .. } => TASK_TIMEOUT,
            Self::Cancelled { .. } => CANCELLED,
            Self::InvalidConfig(_) => INVALID_CONFIG,
        }
    }

    /// HTTP status, for failures the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured details sent by the service
    pub fn details(&self) -> Option<&JsonValue> {
        match self {
            Self::Api { details, .. } | Self::TaskFailed { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// ID of the polled task this failure belongs to
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Self::TaskFailed { task_id, .. }
            | Self::TaskTimeout { task_id, .. }
            | Self::Cancelled { task_id } => Some(task_id),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}
