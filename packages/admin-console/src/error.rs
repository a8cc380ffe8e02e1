//! Error types for the admin console engine.
//!
//! Nothing here is fatal. Stores and the dispatcher catch these at their own
//! boundary and turn them into display strings.

use thiserror::Error;

/// Result type for transport operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors raised by the REST transport collaborator.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Connection failed, timed out, or the body could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response. `message` is the body's `message` field when present.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Build an `Api` error from a non-2xx status and its raw body.
    ///
    /// The backend answers errors with `{"message": "..."}`. Anything else
    /// falls back to a generic message carrying the status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        ApiError::Api { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Local validation failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A reason is required for this action")]
    ReasonRequired,

    #[error("Action cancelled")]
    ConfirmationDeclined,

    #[error("Page {requested} is out of range (1..={pages})")]
    PageOutOfRange { requested: u32, pages: u32 },

    #[error("Search query is empty")]
    EmptySearch,
}

/// Console-level error taxonomy.
#[derive(Debug, Clone, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to load {what}: {source}")]
    FetchFailed {
        what: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("{0}")]
    ActionFailed(#[source] ApiError),

    #[error("Admin access required")]
    AccessDenied,
}

impl ConsoleError {
    pub fn fetch_failed(what: &'static str, source: ApiError) -> Self {
        ConsoleError::FetchFailed { what, source }
    }
}
