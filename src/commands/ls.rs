use crate::display;
use crate::error::{ErrorKind, Result};
use crate::shelf::Shelf;
use clap::Args;
use satchel_browser::FolderBrowser;
use satchel_config::Config;

#[derive(Args)]
pub struct LsArgs {
    /// Shelf to list; defaults to `default_shelf`
    shelf: Option<String>,

    /// Only show entries whose name contains this text (ignoring case)
    #[arg(long, short)]
    filter: Option<String>,
}

pub async fn run(config: &Config, args: LsArgs) -> Result<()> {
    let mut browser = Shelf::open(config, args.shelf.as_deref())?.browser(None);
    print!("{}", list(&mut browser, args.filter).await?);
    Ok(())
}

async fn list(browser: &mut FolderBrowser, filter: Option<String>) -> Result<String> {
    browser.initialize().await;
    if let Some(message) = browser.state().load_state().error() {
        exn::bail!(ErrorKind::Listing(message.to_string()));
    }
    if let Some(filter) = filter {
        browser.set_filter(filter);
    }
    Ok(format!("{}\n{}", display::breadcrumbs(browser), display::listing(browser.state())))
}
