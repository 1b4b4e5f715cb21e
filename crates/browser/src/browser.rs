//! The folder browser.
//!
//! Every navigation is split in two halves so that the browser never has to
//! own a background task:
//!
//! 1. a synchronous `begin_*` call mutates [`NavigationState`] and hands back
//!    a [`PendingListing`] tagged with a [`Ticket`];
//! 2. whoever drives the UI awaits [`PendingListing::fetch()`] wherever it
//!    likes and feeds the result back through [`FolderBrowser::apply()`].
//!
//! Only the completion for the most recently issued ticket is applied, so a
//! slow listing for a folder the user has already left can't clobber the one
//! they're looking at. The plain `async` methods run both halves back to back
//! for callers that don't care.

use crate::error::{ErrorKind, Result};
use crate::history::Crumb;
use crate::opener::OpenerHandle;
use crate::state::NavigationState;
use satchel_provider::error::Result as ProviderResult;
use satchel_provider::{DirectoryEntry, EntryKind, LocationId, ProviderHandle};
use tokio::sync::watch;

/// Identifies one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    location: LocationId,
}
impl Ticket {
    pub fn location(&self) -> &LocationId {
        &self.location
    }
}

/// A listing the browser asked for but hasn't received yet.
#[must_use = "a pending listing does nothing until fetched and applied"]
pub struct PendingListing {
    ticket: Ticket,
    provider: ProviderHandle,
}
impl PendingListing {
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Ask the provider. Doesn't touch the browser, so any number of these can
    /// be in flight while the user keeps navigating.
    pub async fn fetch(self) -> CompletedListing {
        let result = self.provider.list(&self.ticket.location).await;
        CompletedListing {
            ticket: self.ticket,
            result,
        }
    }
}

/// A provider answer, waiting to be handed to [`FolderBrowser::apply()`].
pub struct CompletedListing {
    ticket: Ticket,
    result: ProviderResult<Vec<DirectoryEntry>>,
}
impl CompletedListing {
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }
}

/// What [`FolderBrowser::apply()`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A newer request was issued since; the completion was dropped.
    Superseded,
}

/// Navigable, searchable view over one remote folder tree.
///
/// Holds exactly one folder level in memory at a time. Meant for a single
/// owner (one per screen or session); observers use
/// [`subscribe()`](Self::subscribe).
///
/// # Examples
///
/// ```
/// use satchel_browser::{Crumb, FolderBrowser, LoadState};
/// use satchel_provider::DirectoryEntry;
/// use satchel_provider::provider::MockProvider;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider = MockProvider::default()
///     .with_folder("root", [DirectoryEntry::folder("1", "Math"), DirectoryEntry::file("2", "notes.pdf")])
///     .with_folder("1", Vec::new());
/// let mut browser = FolderBrowser::new(Arc::new(provider), Crumb::new("root", "Material"));
/// browser.initialize().await;
/// assert_eq!(browser.state().load_state(), &LoadState::Ready);
///
/// browser.set_filter("NOT");
/// assert_eq!(browser.state().visible().len(), 1);
/// # }
/// ```
pub struct FolderBrowser {
    provider: ProviderHandle,
    root: Crumb,
    state: NavigationState,
    /// Generation of the most recently issued ticket.
    issued: u64,
    opener: Option<OpenerHandle>,
    updates: watch::Sender<NavigationState>,
}

impl FolderBrowser {
    /// Create a browser positioned at `root`. Nothing is fetched until
    /// [`initialize()`](Self::initialize).
    pub fn new(provider: ProviderHandle, root: Crumb) -> Self {
        let state = NavigationState::new(root.clone());
        let (updates, _) = watch::channel(state.clone());
        Self {
            provider,
            root,
            state,
            issued: 0,
            opener: None,
            updates,
        }
    }

    /// Hand opened files to `opener`. Without one, opening a file is only
    /// logged.
    pub fn with_opener(mut self, opener: OpenerHandle) -> Self {
        self.opener = Some(opener);
        self
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Receive a snapshot of the state after every change.
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.updates.subscribe()
    }

    /// Root first, current folder last.
    pub fn breadcrumbs(&self) -> impl Iterator<Item = &Crumb> {
        self.state.history().iter().chain(std::iter::once(self.state.current()))
    }

    /// Reset to the root folder and list it. Safe to call again at any time.
    pub fn begin_initialize(&mut self) -> PendingListing {
        self.state = NavigationState::new(self.root.clone());
        self.begin_load()
    }

    pub async fn initialize(&mut self) -> Outcome {
        let pending = self.begin_initialize();
        self.complete(pending).await
    }

    /// List the current folder again, e.g. after a failure.
    pub fn begin_refresh(&mut self) -> PendingListing {
        self.begin_load()
    }

    pub async fn refresh(&mut self) -> Outcome {
        let pending = self.begin_refresh();
        self.complete(pending).await
    }

    /// Descend into a folder, or pass a file to the opener.
    ///
    /// Files don't touch navigation state and return `None`.
    pub fn begin_open(&mut self, entry: &DirectoryEntry) -> Option<PendingListing> {
        match entry.kind {
            // Reachable after a failed descent: the parent's listing is still
            // on screen while the folder itself is already current.
            EntryKind::Folder if &entry.id == self.state.current_id() => {
                tracing::debug!(provider = %self.provider.name(), location = %entry.id, "Already in folder, reloading");
                Some(self.begin_load())
            },
            EntryKind::Folder => {
                tracing::debug!(provider = %self.provider.name(), from = %self.state.current_id(), to = %entry.id, "Entering folder");
                self.state.descend(Crumb::from(entry));
                Some(self.begin_load())
            },
            EntryKind::File => {
                self.open_file(entry);
                None
            },
        }
    }

    pub async fn open(&mut self, entry: &DirectoryEntry) -> Option<Outcome> {
        let pending = self.begin_open(entry)?;
        Some(self.complete(pending).await)
    }

    /// [`begin_open()`](Self::begin_open) the entry at `index` in the
    /// *visible* (filtered) list.
    pub fn begin_open_index(&mut self, index: usize) -> Result<Option<PendingListing>> {
        let visible = self.state.visible();
        let Some(entry) = visible.get(index).cloned() else {
            exn::bail!(ErrorKind::NoSuchEntry {
                index,
                visible: visible.len(),
            });
        };
        Ok(self.begin_open(&entry))
    }

    pub async fn open_index(&mut self, index: usize) -> Result<Option<Outcome>> {
        Ok(match self.begin_open_index(index)? {
            Some(pending) => Some(self.complete(pending).await),
            None => None,
        })
    }

    /// Return to the previous folder. `None` (and no change at all) when
    /// already at the root.
    pub fn begin_go_back(&mut self) -> Option<PendingListing> {
        if !self.state.ascend() {
            tracing::trace!(provider = %self.provider.name(), "Already at root");
            return None;
        }
        Some(self.begin_load())
    }

    pub async fn go_back(&mut self) -> Option<Outcome> {
        let pending = self.begin_go_back()?;
        Some(self.complete(pending).await)
    }

    /// Narrow the visible entries to names containing `text`, ignoring case.
    /// Purely local: never triggers a listing.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.state.set_filter(text.into());
        self.publish();
    }

    /// Feed a provider answer back in.
    ///
    /// Applied only when `completed` answers the most recent request;
    /// anything older is dropped without touching state.
    pub fn apply(&mut self, completed: CompletedListing) -> Outcome {
        let CompletedListing { ticket, result } = completed;
        if ticket.generation != self.issued || &ticket.location != self.state.current_id() {
            tracing::debug!(
                provider = %self.provider.name(),
                location = %ticket.location,
                current = %self.state.current_id(),
                "Discarding superseded listing"
            );
            return Outcome::Superseded;
        }
        match result {
            Ok(entries) => {
                tracing::debug!(provider = %self.provider.name(), location = %ticket.location, entries = entries.len(), "Listing loaded");
                self.state.set_entries(entries);
            },
            Err(err) => {
                tracing::warn!(
                    provider = %self.provider.name(),
                    location = %ticket.location,
                    retryable = err.is_retryable(),
                    error = ?err,
                    "Listing failed"
                );
                self.state.set_error((*err).to_string());
            },
        }
        self.publish();
        Outcome::Applied
    }

    fn begin_load(&mut self) -> PendingListing {
        self.issued += 1;
        self.state.set_loading();
        self.publish();
        PendingListing {
            ticket: Ticket {
                generation: self.issued,
                location: self.state.current_id().clone(),
            },
            provider: self.provider.clone(),
        }
    }

    async fn complete(&mut self, pending: PendingListing) -> Outcome {
        let completed = pending.fetch().await;
        self.apply(completed)
    }

    fn open_file(&self, entry: &DirectoryEntry) {
        let view_url = self.provider.view_url(entry);
        tracing::info!(provider = %self.provider.name(), file = %entry.id, name = %entry.name, "Opening file");
        if let Some(opener) = &self.opener {
            opener.open(entry, view_url.as_deref());
        }
    }

    fn publish(&self) {
        // Works with zero subscribers too.
        self.updates.send_replace(self.state.clone());
    }
}
