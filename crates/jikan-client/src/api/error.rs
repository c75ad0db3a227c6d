//! Error taxonomy for governed requests.

use thiserror::Error;

/// Outcome of a failed request, delivered to the caller that enqueued it.
///
/// Transport failures and HTTP error statuses are both surfaced as-is; the
/// governor never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The descriptor could not be turned into a URL
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    /// Connection, DNS or timeout failure
    #[error("request error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not valid JSON or did not match the expected shape
    #[error("failed to parse response: {0}")]
    Decode(String),

    /// The transport panicked while servicing the request
    #[error("request dispatch panicked")]
    Panicked,

    /// The governor stopped before the request was settled
    #[error("request governor is no longer running")]
    Closed,
}

impl ApiError {
    /// Whether upstream rejected the request for exceeding its rate limit
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::Status { status: 429, .. })
    }

    /// HTTP status, when the failure came from an upstream response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
