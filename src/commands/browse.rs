//! Interactive session: one command per line on stdin, the folder view
//! redrawn after each.

use crate::display;
use crate::error::{ErrorKind, Result};
use crate::shelf::Shelf;
use clap::Args;
use exn::ResultExt;
use satchel_browser::error::ErrorKind as BrowserErrorKind;
use satchel_browser::{FileOpener, FolderBrowser, OpenerHandle};
use satchel_config::Config;
use satchel_provider::DirectoryEntry;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

const PROMPT: &str = "> ";
const HELP: &str = "\
  <n>, open <n>     open the nth entry shown
  back, b, ..       go up one folder
  /text             show only names containing text (`/` alone clears)
  filter <text>     same as /text
  refresh, r        list the current folder again
  crumbs            show where you are
  help, ?           this text
  quit, q           leave
";

#[derive(Args)]
pub struct BrowseArgs {
    /// Shelf to browse; defaults to `default_shelf`
    shelf: Option<String>,
}

pub async fn run(config: &Config, args: BrowseArgs) -> Result<()> {
    let shelf = Shelf::open(config, args.shelf.as_deref())?;
    Session::new(shelf).run(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Zero-based position in the visible list
    Open(usize),
    Back,
    Filter(String),
    Refresh,
    Crumbs,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ErrorKind;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim_start();
        // Filter text is kept verbatim, spaces included.
        if let Some(text) = line.strip_prefix('/').or_else(|| line.strip_prefix("filter ")) {
            return Ok(Self::Filter(text.to_string()));
        }
        let line = line.trim_end();
        let position = line.strip_prefix("open ").map(str::trim_start).unwrap_or(line);
        if let Ok(position) = position.parse::<usize>() {
            return position.checked_sub(1).map(Self::Open).ok_or_else(|| ErrorKind::UnknownCommand(line.to_string()));
        }
        Ok(match line {
            "filter" => Self::Filter(String::new()),
            "back" | "b" | ".." => Self::Back,
            "refresh" | "r" => Self::Refresh,
            "crumbs" | "pwd" => Self::Crumbs,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return Err(ErrorKind::UnknownCommand(line.to_string())),
        })
    }
}

/// Collects links for opened files so the session can show them in line
/// with everything else it prints.
#[derive(Default)]
struct LinkOpener {
    opened: Mutex<Vec<String>>,
}
impl FileOpener for LinkOpener {
    fn open(&self, entry: &DirectoryEntry, view_url: Option<&str>) {
        let target = view_url.map(str::to_string).unwrap_or_else(|| entry.id.to_string());
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(format!("Open {}: {target}", entry.name));
        }
    }
}
impl LinkOpener {
    fn take(&self) -> Vec<String> {
        self.opened.lock().map(|mut opened| std::mem::take(&mut *opened)).unwrap_or_default()
    }
}

struct Session {
    browser: FolderBrowser,
    opener: Arc<LinkOpener>,
}

impl Session {
    fn new(shelf: Shelf) -> Self {
        let opener = Arc::new(LinkOpener::default());
        let browser = shelf.browser(Some(opener.clone() as OpenerHandle));
        Self { browser, opener }
    }

    async fn run<R, W>(mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.browser.initialize().await;
        write(&mut output, &display::screen(&self.browser)).await?;
        let mut lines = input.lines();
        loop {
            write(&mut output, PROMPT).await?;
            let Some(line) = lines.next_line().await.or_raise(|| ErrorKind::Terminal)? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            let reply = match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await,
                Err(err) => format!("{err}\n"),
            };
            write(&mut output, &reply).await?;
        }
        tracing::debug!(provider = %self.browser.provider_name(), "Session ended");
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> String {
        match command {
            Command::Open(index) => match self.browser.open_index(index).await {
                Ok(Some(_)) => display::screen(&self.browser),
                Ok(None) => self.opener.take().into_iter().map(|line| line + "\n").collect(),
                Err(err) => match &*err {
                    BrowserErrorKind::NoSuchEntry { visible: 0, .. } => "Nothing to open here\n".to_string(),
                    BrowserErrorKind::NoSuchEntry { visible, .. } => format!("Pick a number from 1 to {visible}\n"),
                },
            },
            Command::Back => match self.browser.go_back().await {
                Some(_) => display::screen(&self.browser),
                None => "Already at the top folder\n".to_string(),
            },
            Command::Filter(text) => {
                self.browser.set_filter(text);
                display::screen(&self.browser)
            },
            Command::Refresh => {
                self.browser.refresh().await;
                display::screen(&self.browser)
            },
            Command::Crumbs => format!("{}\n", display::breadcrumbs(&self.browser)),
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        }
    }
}

async fn write<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await.or_raise(|| ErrorKind::Terminal)?;
    output.flush().await.or_raise(|| ErrorKind::Terminal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use satchel_browser::Crumb;
    use satchel_provider::provider::MockProvider;

    #[rstest]
    #[case("3", Command::Open(2))]
    #[case("  1  ", Command::Open(0))]
    #[case("open 12", Command::Open(11))]
    #[case("back", Command::Back)]
    #[case("..", Command::Back)]
    #[case("/math", Command::Filter("math".to_string()))]
    #[case("/ midterm", Command::Filter(" midterm".to_string()))]
    #[case("/", Command::Filter(String::new()))]
    #[case("filter Unit 1", Command::Filter("Unit 1".to_string()))]
    #[case("filter", Command::Filter(String::new()))]
    #[case("r", Command::Refresh)]
    #[case("crumbs", Command::Crumbs)]
    #[case("?", Command::Help)]
    #[case("quit", Command::Quit)]
    fn test_parse(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(line.parse::<Command>().unwrap(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("open")]
    #[case("open x")]
    #[case("cd Math")]
    fn test_parse_unknown(#[case] line: &str) {
        assert!(matches!(line.parse::<Command>(), Err(ErrorKind::UnknownCommand(_))));
    }

    fn session() -> Session {
        let provider = MockProvider::default()
            .with_folder("root", [DirectoryEntry::folder("1", "Math"), DirectoryEntry::file("2", "notes.pdf")])
            .with_folder("1", Vec::new());
        Session::new(Shelf {
            provider: Arc::new(provider),
            root: Crumb::new("root", "Material"),
        })
    }

    async fn transcript(input: &str) -> String {
        let mut output = Vec::new();
        session().run(input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_session() {
        let output = transcript("/not\n1\nfilter\n\n1\ncrumbs\nback\nback\nfrobnicate\nq\n3\n").await;
        let expected = [
            "Material\n   1. / Math\n   2.   notes.pdf\n> ",
            "Material\n   1.   notes.pdf\n  (filter \"not\": 1 of 2)\n> ",
            "Open notes.pdf: mock://mock/2\n> ",
            "Material\n   1. / Math\n   2.   notes.pdf\n> > ",
            "Material > Math\n  No files found in this folder\n  (back: go up one folder)\n> ",
            "Material > Math\n> ",
            "Material\n   1. / Math\n   2.   notes.pdf\n> ",
            "Already at the top folder\n> ",
            "unknown command `frobnicate` (try `help`)\n> ",
        ]
        .concat();
        assert_eq!(output, expected);
    }

    #[tokio::test]
    async fn test_session_reports_bad_position() {
        let output = transcript("5\n/zzz\n1\n").await;
        assert!(output.contains("> Pick a number from 1 to 2\n"));
        assert!(output.ends_with("> Nothing to open here\n> "));
    }
}
