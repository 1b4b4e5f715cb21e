//! Plain-text rendering of a browser's state.

use satchel_browser::{FolderBrowser, LoadState, NavigationState};
use satchel_provider::{DirectoryEntry, EntryKind};
use std::borrow::Cow;
use std::fmt::Write;

/// Long names get cut so the listing stays one entry per line.
pub const NAME_WIDTH: usize = 48;
const ELLIPSIS: &str = "...";

/// Shortens `name` to at most `max_chars` characters (ellipsis included),
/// cutting on a `char` boundary so multi-byte names never split mid-code
/// point.
pub fn truncate_name(name: &str, max_chars: usize) -> Cow<'_, str> {
    if name.chars().count() <= max_chars {
        return Cow::Borrowed(name);
    }
    if max_chars < ELLIPSIS.len() {
        return Cow::Borrowed(&ELLIPSIS[..max_chars]);
    }
    let keep = max_chars - ELLIPSIS.len();
    let cut = name.char_indices().nth(keep).map(|(at, _)| at).unwrap_or(name.len());
    Cow::Owned(format!("{}{ELLIPSIS}", &name[..cut]))
}

/// Binary units, one decimal place.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    match unit {
        0 => format!("{bytes} B"),
        _ => format!("{size:.1} {}", UNITS[unit]),
    }
}

pub fn breadcrumbs(browser: &FolderBrowser) -> String {
    browser.breadcrumbs().map(|crumb| crumb.name.as_str()).collect::<Vec<_>>().join(" > ")
}

fn entry_line(out: &mut String, position: usize, entry: &DirectoryEntry) {
    let marker = match entry.kind {
        EntryKind::Folder => "/",
        EntryKind::File => " ",
    };
    let _ = write!(out, "{position:>4}. {marker} {}", truncate_name(&entry.name, NAME_WIDTH));
    if let Some(size) = entry.size {
        let _ = write!(out, "  ({})", human_size(size));
    }
    out.push('\n');
}

/// The visible entries, numbered from 1.
pub fn listing(state: &NavigationState) -> String {
    let mut out = String::new();
    if state.visible().is_empty() {
        match state.filter().is_empty() {
            true => out.push_str("  No files found in this folder\n"),
            false => {
                let _ = writeln!(out, "  Nothing matches \"{}\"", state.filter());
            },
        }
    }
    for (index, entry) in state.visible().iter().enumerate() {
        entry_line(&mut out, index + 1, entry);
    }
    out
}

/// Everything shown after each command in an interactive session.
pub fn screen(browser: &FolderBrowser) -> String {
    let state = browser.state();
    let mut out = String::new();
    let _ = writeln!(out, "{}", breadcrumbs(browser));
    match state.load_state() {
        LoadState::Idle => {},
        LoadState::Loading => out.push_str("  Loading...\n"),
        LoadState::Ready => out.push_str(&listing(state)),
        LoadState::Error(message) => {
            let _ = writeln!(out, "  Failed to load files: {message}");
            // Stale but better than nothing.
            if !state.entries().is_empty() {
                out.push_str(&listing(state));
            }
        },
    }
    if !state.filter().is_empty() {
        let _ = writeln!(
            out,
            "  (filter \"{}\": {} of {})",
            state.filter(),
            state.visible().len(),
            state.entries().len()
        );
    }
    if !state.at_root() {
        out.push_str("  (back: go up one folder)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use satchel_browser::Crumb;
    use satchel_provider::error::ErrorKind as ProviderErrorKind;
    use satchel_provider::provider::MockProvider;
    use std::sync::Arc;

    #[rstest]
    #[case("notes.pdf", 25, "notes.pdf")]
    #[case("exactly-ten", 11, "exactly-ten")]
    #[case("Engineering Mathematics III.pdf", 12, "Engineeri...")]
    #[case("Übungsblätter für Analysis", 10, "Übungsb...")]
    #[case("abcdef", 3, "...")]
    #[case("abcdef", 2, "..")]
    #[case("abcdef", 0, "")]
    #[case("", 5, "")]
    fn test_truncate_name(#[case] name: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate_name(name, max), expected);
    }

    #[rstest]
    #[case(0, "0 B")]
    #[case(1023, "1023 B")]
    #[case(1024, "1.0 KiB")]
    #[case(52311, "51.1 KiB")]
    #[case(5 * 1024 * 1024, "5.0 MiB")]
    fn test_human_size(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(human_size(bytes), expected);
    }

    fn provider() -> Arc<MockProvider> {
        Arc::new(
            MockProvider::default()
                .with_folder(
                    "root",
                    [DirectoryEntry::folder("1", "Math"), DirectoryEntry::file("2", "notes.pdf").with_size(2048)],
                )
                .with_folder("1", Vec::new()),
        )
    }

    #[tokio::test]
    async fn test_screen_at_root() {
        let mut browser = FolderBrowser::new(provider(), Crumb::new("root", "Material"));
        browser.initialize().await;
        assert_eq!(screen(&browser), "Material\n   1. / Math\n   2.   notes.pdf  (2.0 KiB)\n");
        browser.set_filter("zzz");
        assert_eq!(screen(&browser), "Material\n  Nothing matches \"zzz\"\n  (filter \"zzz\": 0 of 2)\n");
    }

    #[tokio::test]
    async fn test_screen_empty_subfolder() {
        let mut browser = FolderBrowser::new(provider(), Crumb::new("root", "Material"));
        browser.initialize().await;
        browser.open_index(0).await.unwrap();
        assert_eq!(
            screen(&browser),
            "Material > Math\n  No files found in this folder\n  (back: go up one folder)\n"
        );
    }

    #[tokio::test]
    async fn test_screen_error_keeps_stale_listing() {
        let provider = provider();
        let mut browser = FolderBrowser::new(provider.clone(), Crumb::new("root", "Material"));
        browser.initialize().await;
        provider.fail("root", |_| ProviderErrorKind::Network("timed out".into())).await;
        browser.refresh().await;
        let screen = screen(&browser);
        assert!(screen.starts_with("Material\n  Failed to load files: network error: timed out\n"));
        assert!(screen.contains("1. / Math"));
    }
}
