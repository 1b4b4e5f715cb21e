pub mod error;
mod location;
mod models;
pub mod provider;

pub use crate::location::{LocationId, validate as validate_location};
pub use crate::models::{DirectoryEntry, EntryKind};
pub use crate::provider::DirectoryProvider;
use std::sync::Arc;

pub type ProviderHandle = Arc<dyn DirectoryProvider + Send + Sync>;
