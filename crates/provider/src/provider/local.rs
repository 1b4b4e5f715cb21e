//! Local filesystem directory provider.
//!
//! This module provides a directory provider for a folder tree on the local
//! filesystem. Location ids are paths relative to the configured root
//! directory, and the root folder itself is the empty id.

use crate::error::{ErrorKind, Result};
use crate::provider::EntryStream;
use crate::{DirectoryEntry, DirectoryProvider, EntryKind, LocationId, validate_location};
use async_stream::stream;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, DirEntry};

/// Local filesystem directory provider.
///
/// # Examples
///
/// ```no_run
/// use satchel_provider::provider::LocalProvider;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = LocalProvider::new("pyq", "/srv/papers")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalProvider {
    name: String,
    /// Root directory of the folder tree
    root: PathBuf,
}
impl LocalProvider {
    /// Create a new local filesystem provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or doesn't point at an
    /// existing directory. Browsing never creates anything.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let display = root.display().to_string();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidLocation(display));
        }
        if !root.is_dir() {
            exn::bail!(ErrorKind::NotFound(display));
        }
        Ok(Self { name: name.into(), root })
    }

    /// The id of the root folder.
    pub fn root_id(&self) -> LocationId {
        LocationId::default()
    }

    fn child_id(parent: &Path, name: &str) -> LocationId {
        let relative = parent.join(name);
        // Always separate with forward slashes, so ids look the same on every
        // platform (and in config files).
        let parts: Vec<_> = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect();
        LocationId::new(parts.join("/"))
    }

    fn map_io_error(e: std::io::Error, location: &LocationId) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(location.to_string()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(location.to_string()),
            _ => ErrorKind::Io(e),
        }
    }

    /// Keeps the stream loop free of error plumbing: convert one directory
    /// entry into a listing entry, or `None` to skip it.
    async fn process_entry(&self, entry: DirEntry, relative: &Path, location: &LocationId) -> Result<Option<DirectoryEntry>> {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::warn!(provider = %self.name, path = %entry.path().display(), "Skipping non-UTF8 file name");
            return Ok(None);
        };
        // Follows symlinks, so a link to a folder is browsable like a folder.
        let metadata = match fs::metadata(entry.path()).await {
            Ok(metadata) => metadata,
            // Note: silently drop what is most likely a broken symlink.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => exn::bail!(Self::map_io_error(e, location)),
        };
        let id = Self::child_id(relative, name);
        if metadata.is_dir() {
            return Ok(Some(DirectoryEntry::new(id, name, EntryKind::Folder)));
        }
        if metadata.is_file() {
            let mut file = DirectoryEntry::new(id, name, EntryKind::File).with_size(metadata.len());
            if let Ok(modified) = metadata.modified() {
                file = file.with_modified(modified.into());
            }
            return Ok(Some(file));
        }
        Ok(None)
    }
}

#[async_trait]
impl DirectoryProvider for LocalProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_stream<'a>(&'a self, location: &'a LocationId) -> EntryStream<'a> {
        let relative = match validate_location(location) {
            Ok(relative) => relative,
            Err(e) => return Box::pin(futures::stream::once(async move { Err(e) })),
        };
        let absolute = self.root.join(&relative);

        Box::pin(stream! {
            tracing::debug!(provider = %self.name, location = %location, "Reading directory");
            match fs::read_dir(&absolute).await {
                Err(e) => yield Err(exn::Exn::from(Self::map_io_error(e, location))),
                Ok(mut entries) => loop {
                    let entry = match entries.next_entry().await {
                        Ok(Some(entry)) => entry,
                        Ok(None) => break,
                        Err(e) => {
                            yield Err(exn::Exn::from(Self::map_io_error(e, location)));
                            break;
                        },
                    };
                    match self.process_entry(entry, &relative, location).await {
                        Ok(Some(entry)) => yield Ok(entry),
                        Ok(None) => {},
                        Err(e) => yield Err(e),
                    }
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, LocalProvider) {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("Math/Unit 1")).unwrap();
        std::fs::create_dir_all(temp_dir.path().join("Physics")).unwrap();
        std::fs::write(temp_dir.path().join("notes.pdf"), b"%PDF-1.7").unwrap();
        std::fs::write(temp_dir.path().join("Math/syllabus.pdf"), b"%PDF").unwrap();
        let provider = LocalProvider::new("local", temp_dir.path()).unwrap();
        (temp_dir, provider)
    }

    fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
        let mut names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        // Directory order is platform-dependent.
        names.sort();
        names
    }

    #[test]
    fn test_new_requires_absolute_existing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalProvider::new("name", temp_dir.path()).is_ok());
        assert!(LocalProvider::new("name", "relative/path").is_err());
        let err = LocalProvider::new("name", temp_dir.path().join("missing")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_root_is_one_level() {
        let (_temp_dir, provider) = fixture();
        let entries = provider.list(&provider.root_id()).await.unwrap();
        assert_eq!(names(&entries), ["Math", "Physics", "notes.pdf"]);
        let notes = entries.iter().find(|e| e.name == "notes.pdf").unwrap();
        assert_eq!(notes.kind, EntryKind::File);
        assert_eq!(notes.id, "notes.pdf");
        assert_eq!(notes.size, Some(8));
        assert!(notes.modified.is_some());
        let math = entries.iter().find(|e| e.name == "Math").unwrap();
        assert_eq!(math.kind, EntryKind::Folder);
        assert_eq!(math.id, "Math");
    }

    #[tokio::test]
    async fn test_list_child_ids_are_nested() {
        let (_temp_dir, provider) = fixture();
        let entries = provider.list(&LocationId::from("Math")).await.unwrap();
        assert_eq!(names(&entries), ["Unit 1", "syllabus.pdf"]);
        let unit = entries.iter().find(|e| e.is_folder()).unwrap();
        assert_eq!(unit.id, "Math/Unit 1");
        assert!(provider.list(&unit.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_missing_folder() {
        let (_temp_dir, provider) = fixture();
        let err = provider.list(&LocationId::from("Chemistry")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_traversal_rejected() {
        let (_temp_dir, provider) = fixture();
        let err = provider.list(&LocationId::from("../..")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidLocation(_)));
    }

    #[tokio::test]
    async fn test_view_url_is_none() {
        let (_temp_dir, provider) = fixture();
        assert!(provider.view_url(&DirectoryEntry::file("notes.pdf", "notes.pdf")).is_none());
    }
}
