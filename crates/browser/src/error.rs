//! Browser Error Types
//!
//! Listing failures never surface here: they are folded into
//! [`LoadState::Error`](crate::LoadState::Error). These errors are for
//! callers asking the browser to do something impossible.

use derive_more::{Display, Error};

/// A browser error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for browser operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Index doesn't point at a currently visible entry
    #[display("no entry at position {index} (only {visible} visible)")]
    NoSuchEntry { index: usize, visible: usize },
}
