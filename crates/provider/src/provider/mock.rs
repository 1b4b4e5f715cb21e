//! In-memory directory provider for testing.

use super::EntryStream;
use crate::error::ErrorKind;
use crate::{DirectoryEntry, DirectoryProvider, LocationId};
use async_stream::stream;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{RwLock, watch};

type Failure = Box<dyn Fn(&LocationId) -> ErrorKind + Send + Sync>;

/// In-memory directory provider for testing.
///
/// Folders are stored in a `HashMap` behind a [`RwLock`], so all trait
/// methods can operate on `&self` without external synchronisation. Listings
/// come back in exactly the order they were registered, failures can be
/// injected per folder, listings can be held back until released, and every
/// listing request is counted.
///
/// # Examples
///
/// ```
/// use satchel_provider::{DirectoryEntry, DirectoryProvider, LocationId};
/// use satchel_provider::provider::MockProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = MockProvider::default()
///     .with_folder("root", [DirectoryEntry::folder("1", "Math"), DirectoryEntry::file("2", "notes.pdf")])
///     .with_folder("1", Vec::new());
/// let entries = provider.list(&LocationId::from("root")).await?;
/// assert_eq!(entries.len(), 2);
/// assert_eq!(provider.calls(&LocationId::from("root")).await, 1);
/// # Ok(())
/// # }
/// ```
pub struct MockProvider {
    name: String,
    folders: RwLock<HashMap<LocationId, Vec<DirectoryEntry>>>,
    failures: RwLock<HashMap<LocationId, Failure>>,
    calls: RwLock<HashMap<LocationId, usize>>,
    gates: RwLock<HashMap<LocationId, watch::Sender<bool>>>,
}

impl MockProvider {
    /// Register (or replace) the listing of a folder.
    pub fn with_folder(
        mut self,
        location: impl Into<LocationId>,
        entries: impl IntoIterator<Item = DirectoryEntry>,
    ) -> Self {
        self.folders.get_mut().insert(location.into(), entries.into_iter().collect());
        self
    }

    /// Change the name of the mock provider.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the listing of a folder after construction, e.g. to simulate
    /// remote changes between a load and a refresh.
    pub async fn set_folder(&self, location: impl Into<LocationId>, entries: impl IntoIterator<Item = DirectoryEntry>) {
        self.folders.write().await.insert(location.into(), entries.into_iter().collect());
    }

    /// Make every listing of `location` fail until [`recover()`](Self::recover)
    /// is called.
    pub async fn fail(&self, location: impl Into<LocationId>, failure: impl Fn(&LocationId) -> ErrorKind + Send + Sync + 'static) {
        self.failures.write().await.insert(location.into(), Box::new(failure));
    }

    pub async fn recover(&self, location: &LocationId) {
        self.failures.write().await.remove(location);
    }

    /// Listings of `location` wait (after being counted) until
    /// [`release()`](Self::release) is called.
    pub async fn hold(&self, location: impl Into<LocationId>) {
        let (gate, _) = watch::channel(false);
        self.gates.write().await.insert(location.into(), gate);
    }

    /// Let every held listing of `location` through, and stop holding new ones.
    pub async fn release(&self, location: &LocationId) {
        if let Some(gate) = self.gates.write().await.remove(location) {
            gate.send_replace(true);
        }
    }

    /// How many times `location` has been listed.
    pub async fn calls(&self, location: &LocationId) -> usize {
        self.calls.read().await.get(location).copied().unwrap_or(0)
    }
}
impl Default for MockProvider {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            folders: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            calls: RwLock::new(HashMap::new()),
            gates: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl DirectoryProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_stream<'a>(&'a self, location: &'a LocationId) -> EntryStream<'a> {
        Box::pin(stream! {
            *self.calls.write().await.entry(location.clone()).or_default() += 1;
            let gate = self.gates.read().await.get(location).map(watch::Sender::subscribe);
            if let Some(mut gate) = gate {
                // Released gates are dropped, which also ends the wait.
                let _ = gate.wait_for(|open| *open).await;
            }
            let failure = self.failures.read().await.get(location).map(|failure| failure(location));
            // Snapshot the listing under the read lock, then drop it before
            // yielding to avoid holding the lock across yield points.
            let entries = self.folders.read().await.get(location).cloned();
            match (failure, entries) {
                (Some(kind), _) => yield Err(exn::Exn::from(kind)),
                (None, Some(entries)) => for entry in entries {
                    yield Ok(entry);
                },
                (None, None) => yield Err(exn::Exn::from(ErrorKind::NotFound(location.to_string()))),
            }
        })
    }

    fn view_url(&self, entry: &DirectoryEntry) -> Option<String> {
        (!entry.is_folder()).then(|| format!("mock://{}/{}", self.name, entry.id))
    }
}
