//! Backend error types

use thiserror::Error;

/// Errors from talking to the generation backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network-level failure (connect, send, read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP response
    #[error("backend returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The backend signaled failure through an `error` event in the stream
    #[error("generation failed: {0}")]
    Remote(String),
}
