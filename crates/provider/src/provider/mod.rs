//! Directory provider trait and implementations.
//!
//! This module defines the `DirectoryProvider` trait, which provides a unified
//! interface for listing one level of a remote folder tree across different
//! providers (local filesystem, Google Drive, etc.).

#[cfg(feature = "drive")]
mod drive;
mod local;
#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "drive")]
pub use self::drive::{DriveLink, DriveProvider};
pub use self::local::LocalProvider;
#[cfg(feature = "mock")]
pub use self::mock::MockProvider;
use crate::error::Result;
use crate::{DirectoryEntry, LocationId};
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use std::pin::Pin;

pub type EntryStream<'a> = Pin<Box<dyn Stream<Item = Result<DirectoryEntry>> + Send + 'a>>;

/// Unified interface for directory providers.
///
/// A provider answers exactly one question: "what is directly inside this
/// folder?". Listings are read-only and idempotent, so callers are free to
/// issue the same request twice or to drop a request half-way through.
///
/// # Examples
///
/// ```
/// use satchel_provider::{DirectoryProvider, LocationId, error::Result};
///
/// async fn count_folders(provider: &dyn DirectoryProvider, root: &LocationId) -> Result<usize> {
///     let entries = provider.list(root).await?;
///     Ok(entries.iter().filter(|entry| entry.is_folder()).count())
/// }
/// ```
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Name of the configured provider (taken from the configuration object
    /// key). Used for logging only.
    fn name(&self) -> &str;

    /// List the complete contents of one folder.
    ///
    /// Default implementation of this method is to collect all the results
    /// from [`list_stream()`](Self::list_stream) into a [`Vec`] before
    /// returning. Order is whatever the provider yields; it is never sorted.
    async fn list(&self, location: &LocationId) -> Result<Vec<DirectoryEntry>> {
        self.list_stream(location).try_collect().await
    }

    /// Stream the entries directly inside `location`.
    ///
    /// Providers that paginate must follow every page before the stream
    /// ends; consumers treat the end of the stream as the end of the
    /// listing.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::TryStreamExt;
    /// # use satchel_provider::{DirectoryProvider, LocationId, error::Result};
    /// # async fn example(provider: &dyn DirectoryProvider) -> Result<()> {
    /// let root = LocationId::from("");
    /// let mut stream = provider.list_stream(&root);
    /// while let Some(entry) = stream.try_next().await? {
    ///     println!("{:?} {}", entry.kind, entry.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn list_stream<'a>(&'a self, location: &'a LocationId) -> EntryStream<'a>;

    /// Link that an external viewer can use to open a file entry.
    ///
    /// Providers without a shareable representation return `None`.
    fn view_url(&self, _entry: &DirectoryEntry) -> Option<String> {
        None
    }
}
