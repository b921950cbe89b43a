//! Error types for all colloquy crates.

use std::time::Duration;

/// Errors from chat transport operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // Retryable errors
    /// Network-level error (connection reset, DNS failure, etc.).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// Server is temporarily unavailable (5xx).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    // Terminal errors
    /// Server rejected the request.
    #[error("http {status}: {body}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The response body, verbatim.
        body: String,
    },
    /// Could not parse the server's response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether this error is likely transient and the request can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::ServiceUnavailable(_)
        )
    }
}

/// Errors from session submissions.
///
/// Both variants are precondition rejections: the submission had no effect
/// on the conversation state. Failures of an accepted submission surface in
/// the state itself (`last_error`), never through this type.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The submitted text was empty after trimming.
    #[error("message is empty")]
    EmptyMessage,
    /// A stream is already in flight; the submission was rejected, not queued.
    #[error("a submission is already in progress")]
    Busy,
}
