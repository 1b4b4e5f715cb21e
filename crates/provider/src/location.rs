//! Location identifiers and validation utilities.
//!
//! A [`LocationId`] is opaque to everything except the provider that issued
//! it. Providers backed by a real directory tree (see
//! [`LocalProvider`](crate::provider::LocalProvider)) use [`validate`] to
//! make sure an id can't be used to escape the provider root.

use derive_more::Display;
use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Opaque identifier of a folder, meaningful only to its provider.
#[derive(Debug, Display, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{_0}")]
pub struct LocationId(String);
impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
impl From<String> for LocationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl AsRef<str> for LocationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
impl PartialEq<&str> for LocationId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Validates a path-like location id for security and correctness.
/// Ensures that ids don't escape the provider root (no `..` traversal).
///
/// Unlike file paths, the empty id is valid: it names the root folder.
///
/// > **Note:** This does **not** normalize backslashes, non-UTF8 bytes, or
/// >           platform-specific weirdness. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized, root-relative path if valid, or
/// [`InvalidLocation`](crate::error::ErrorKind::InvalidLocation) if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use satchel_provider::validate_location;
/// // Valid ids
/// assert!(validate_location("Semester 1/Math").is_ok());
/// assert!(validate_location("a/../notes").is_ok()); // (never leaves the root)
/// assert_eq!(validate_location("").unwrap(), Path::new(""));
/// // Invalid ids
/// assert!(validate_location("../etc").is_err());
/// assert!(validate_location("a/../../b").is_err());
/// assert!(validate_location("a\0b").is_err());
/// // Ids get resolved
/// assert_eq!(
///     validate_location("wrong/../still-wrong/.././correct//./folder/").unwrap(),
///     Path::new("correct/folder")
/// );
/// ```
pub fn validate(id: impl AsRef<str>) -> Result<PathBuf> {
    let id = id.as_ref();
    let mut components = Vec::new();
    for component in Path::new(id).components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidLocation(id.to_string()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidLocation(id.to_string())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidLocation(id.to_string()));
                }
            },
        }
    }
    Ok(components.into_iter().collect())
}
