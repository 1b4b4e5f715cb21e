//! Google Drive directory provider.
//!
//! Lists folders through the Drive v3 `files.list` endpoint, authenticated
//! with a plain API key. That's enough for folders shared with "anyone with
//! the link", which is the only kind of folder this provider is meant for.
//!
//! Folder ids are the Drive file ids of folders; a folder's children are
//! found with the query `'<id>' in parents`.

use crate::error::{ErrorKind, Result};
use crate::provider::EntryStream;
use crate::{DirectoryEntry, DirectoryProvider, EntryKind, LocationId};
use async_stream::stream;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/drive/v3/files";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
/// Largest page size the Drive API accepts.
const PAGE_SIZE: &str = "1000";
const FIELDS: &str = "nextPageToken, files(id, name, mimeType, size, modifiedTime)";

/// Which kind of link [`DirectoryProvider::view_url`] hands out for files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DriveLink {
    /// Full Drive viewer page
    #[default]
    View,
    /// Embeddable preview (renders PDFs inline)
    Preview,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    mime_type: String,
    /// Drive encodes int64 values as JSON strings.
    size: Option<String>,
    modified_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Google Drive directory provider.
///
/// # Examples
///
/// ```no_run
/// use satchel_provider::provider::{DriveLink, DriveProvider};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = DriveProvider::new("material", "api-key", DriveLink::View, Duration::from_secs(30))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DriveProvider {
    name: String,
    client: reqwest::Client,
    api_key: String,
    link: DriveLink,
    base_url: String,
}

impl DriveProvider {
    /// Create a new Google Drive provider.
    ///
    /// # Arguments
    /// * `name` - A name for this provider (used in logging)
    /// * `api_key` - Google Cloud API key with the Drive API enabled
    /// * `link` - Which kind of link to produce for files
    /// * `timeout` - Per-request timeout, covering connect and body
    pub fn new(name: impl Into<String>, api_key: impl Into<String>, link: DriveLink, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ErrorKind::Network(e.to_string()))?;
        Ok(Self {
            name: name.into(),
            client,
            api_key: api_key.into(),
            link,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the provider at a different `files` endpoint (proxies, test
    /// servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn parents_query(location: &LocationId) -> String {
        let escaped = location.as_str().replace('\\', "\\\\").replace('\'', "\\'");
        format!("'{escaped}' in parents and trashed = false")
    }

    async fn fetch_page(&self, location: &LocationId, page_token: Option<&str>) -> Result<FileList> {
        let query = Self::parents_query(location);
        let mut params = vec![
            ("q", query.as_str()),
            ("key", self.api_key.as_str()),
            ("fields", FIELDS),
            ("pageSize", PAGE_SIZE),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        tracing::debug!(provider = %self.name, location = %location, paged = page_token.is_some(), "Requesting folder listing");
        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ErrorKind::Network(e.without_url().to_string()))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| ErrorKind::Network(e.without_url().to_string()))?;
        if !status.is_success() {
            exn::bail!(Self::status_error(status.as_u16(), &body));
        }
        Ok(Self::decode_page(&body)?)
    }

    fn decode_page(body: &[u8]) -> std::result::Result<FileList, ErrorKind> {
        serde_json::from_slice(body).map_err(|e| ErrorKind::Malformed(e.to_string()))
    }

    /// Drive explains failures in a JSON envelope; fall back to the raw
    /// status when the body isn't one.
    fn status_error(status: u16, body: &[u8]) -> ErrorKind {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .map(|body| body.error.message)
            .unwrap_or_else(|_| format!("API Error: {status}"));
        ErrorKind::Provider { status, message }
    }

    fn into_entry(file: DriveFile) -> DirectoryEntry {
        let kind = match file.mime_type == FOLDER_MIME_TYPE {
            true => EntryKind::Folder,
            false => EntryKind::File,
        };
        let mut entry = DirectoryEntry::new(file.id, file.name, kind);
        if let Some(size) = file.size.as_deref().and_then(|s| s.parse().ok()) {
            entry = entry.with_size(size);
        }
        if let Some(modified) = file.modified_time.as_deref().and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok()) {
            entry = entry.with_modified(modified);
        }
        entry.with_attribute("mimeType", file.mime_type)
    }
}

#[async_trait]
impl DirectoryProvider for DriveProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_stream<'a>(&'a self, location: &'a LocationId) -> EntryStream<'a> {
        Box::pin(stream! {
            let mut page_token: Option<String> = None;
            let mut seen_tokens = HashSet::new();
            loop {
                let page = match self.fetch_page(location, page_token.as_deref()).await {
                    Ok(page) => page,
                    Err(e) => {
                        yield Err(e);
                        break;
                    },
                };
                for file in page.files {
                    yield Ok(Self::into_entry(file));
                }
                match page.next_page_token {
                    Some(token) if token.is_empty() => break,
                    Some(token) if !seen_tokens.insert(token.clone()) => {
                        yield Err(exn::Exn::from(ErrorKind::Malformed(format!("page token `{token}` was handed out twice"))));
                        break;
                    },
                    Some(token) => page_token = Some(token),
                    None => break,
                }
            }
        })
    }

    fn view_url(&self, entry: &DirectoryEntry) -> Option<String> {
        if entry.is_folder() {
            return None;
        }
        let suffix = match self.link {
            DriveLink::View => "view",
            DriveLink::Preview => "preview",
        };
        Some(format!("https://drive.google.com/file/d/{}/{suffix}", entry.id))
    }
}
