//! CLI Error Types

use derive_more::{Display, Error};

/// A CLI error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("could not open shelf `{_0}`")]
    Shelf(#[error(not(source))] String),
    /// The listing itself failed; the browser already carries the reason
    #[display("listing failed: {_0}")]
    Listing(#[error(not(source))] String),
    #[display("terminal I/O error")]
    Terminal,
    #[display("unknown command `{_0}` (try `help`)")]
    UnknownCommand(#[error(not(source))] String),
    #[display("shelf `{_0}` uses Drive, but this build has no Drive support")]
    DriveDisabled(#[error(not(source))] String),
}
