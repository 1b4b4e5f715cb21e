//! Provider Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;

/// A provider error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Folder does not exist
    #[display("folder not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Access denied (permissions or credentials)
    #[display("permission denied: {_0}")]
    PermissionDenied(#[error(not(source))] String),
    /// Location id is malformed or escapes the provider root
    #[display("invalid location: {_0}")]
    InvalidLocation(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Could not reach the provider at all (DNS, TLS, timeout, ...)
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The provider answered, but refused the request
    #[display("provider error ({status}): {message}")]
    Provider {
        status: u16,
        message: String,
    },
    /// The provider answered with something we couldn't decode
    #[display("malformed response: {_0}")]
    Malformed(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Io(_) | Self::Network(_) => true,
            // Rate limiting and server-side hiccups.
            Self::Provider { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
