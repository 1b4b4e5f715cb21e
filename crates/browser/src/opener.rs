use satchel_provider::DirectoryEntry;
use std::sync::Arc;

/// Whoever actually does something with a file the user opened: launches a
/// viewer, downloads it, prints a link. The browser only hands it the entry
/// (and the provider's view link, when there is one).
pub trait FileOpener: Send + Sync {
    fn open(&self, entry: &DirectoryEntry, view_url: Option<&str>);
}

pub type OpenerHandle = Arc<dyn FileOpener>;
