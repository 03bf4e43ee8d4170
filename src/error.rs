// Error types module

use thiserror::Error;

/// Centralized error type for remote catalog calls
///
/// Categorizes failures into 3 types so callers can distinguish
/// deadline expiry from server rejections and plain transport faults.
/// The type is `Clone` because a single settle event may be shared
/// across many coalesced waiters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Network call exceeded the request deadline
    #[error("request timeout: the server took too long to respond")]
    Timeout,

    /// Non-2xx response, with the server's `status_message` when one
    /// could be parsed from the error body
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Any other network failure (DNS, connect, body read, bad JSON)
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Build an HTTP error from a status code and an optional server message.
    /// Falls back to a status-coded message when the body carried none.
    pub fn http(status: u16, status_message: Option<String>) -> Self {
        let message =
            status_message.unwrap_or_else(|| format!("HTTP error: status {}", status));
        ApiError::Http { status, message }
    }

    /// Status code for HTTP errors, None otherwise
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
