//! Scorer error types.

use thiserror::Error;

/// Errors that can occur when talking to a remote scoring service.
#[derive(Debug, Error)]
pub enum ScorerError {
    /// The service returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
