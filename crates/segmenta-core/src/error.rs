//! Error types for segmenta.

use thiserror::Error;

/// Result type alias using segmenta's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for segmenta operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input failed validation before any network call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate keyword or persona assignment (HTTP 409)
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP/network request failed at the transport level
    #[error("Request error: {0}")]
    Request(String),

    /// Backend returned a non-2xx status
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Reclassification job error
    #[error("Job error: {0}")]
    Job(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

impl Error {
    /// True when retrying the same request cannot succeed without a change
    /// in input (validation and duplicate failures).
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Duplicate(_))
    }
}
