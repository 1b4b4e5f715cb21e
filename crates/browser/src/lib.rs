mod browser;
pub mod error;
mod history;
mod opener;
mod state;

pub use crate::browser::{CompletedListing, FolderBrowser, Outcome, PendingListing, Ticket};
pub use crate::history::{Crumb, History};
pub use crate::opener::{FileOpener, OpenerHandle};
pub use crate::state::{LoadState, NavigationState};
