//! Provider models.
//!
//! These types represent one level of a remote folder listing, independent of
//! whichever provider produced it.

use crate::LocationId;
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Folder,
}

/// One file-or-folder record returned by a listing.
///
/// The browser only ever looks at `id`, `name` and `kind`. Everything else is
/// carried along for display purposes or for the file opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Stable identifier, unique within the provider's namespace
    pub id: LocationId,
    /// Display name
    pub name: String,
    pub kind: EntryKind,
    /// File size in bytes, when the provider reports one
    pub size: Option<u64>,
    /// Last modified timestamp, when the provider reports one
    pub modified: Option<OffsetDateTime>,
    /// Provider-specific attributes (e.g. a content-type), passed through
    /// verbatim and never interpreted
    pub attributes: BTreeMap<String, String>,
}
impl DirectoryEntry {
    pub fn new(id: impl Into<LocationId>, name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            size: None,
            modified: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn file(id: impl Into<LocationId>, name: impl Into<String>) -> Self {
        Self::new(id, name, EntryKind::File)
    }

    pub fn folder(id: impl Into<LocationId>, name: impl Into<String>) -> Self {
        Self::new(id, name, EntryKind::Folder)
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_modified(mut self, modified: OffsetDateTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}
