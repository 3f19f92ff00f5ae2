//! Error taxonomy for remote operations.
//!
//! Every remote call is attempted exactly once; failures are converted into
//! one of these variants at the call site and surfaced to the user. None of
//! them are fatal to the process.

use thiserror::Error;

/// Errors surfaced by client operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field was empty; caught before any network call.
    #[error("{0}")]
    Validation(String),

    /// The server rejected the credentials (HTTP 401).
    #[error("{0}")]
    Auth(String),

    /// Any other non-2xx reply, carrying the server message when present.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// No response at all (connection refused, DNS, timeout).
    #[error("Could not reach the server: {0}")]
    Network(#[from] reqwest::Error),
}

/// Type alias for Result with ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
