//! Config Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Sources couldn't be read or merged (syntax errors, wrong types)
    #[display("could not load configuration")]
    Load,
    #[display("unsupported configuration format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// Configuration parsed fine but makes no sense
    #[display("invalid configuration: {_0}")]
    Invalid(#[error(not(source))] String),
    #[display("no shelves configured")]
    NoShelves,
    #[display("unknown shelf: {_0}")]
    UnknownShelf(#[error(not(source))] String),
}
