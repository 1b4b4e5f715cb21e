//! Browse shared study folders from the terminal.

mod commands;
mod display;
mod error;
mod shelf;

use crate::error::{ErrorKind, Result};
use clap::{Parser, Subcommand};
use exn::ResultExt;
use satchel_config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "satchel", version, about = "Browse shared study folders from the terminal")]
struct Cli {
    /// Config file (TOML, YAML or JSON); defaults to satchel.toml in the
    /// platform config directory
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log more (repeatable); overrides RUST_LOG
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured shelves
    Shelves,
    /// Print the top folder of a shelf
    Ls(commands::ls::LsArgs),
    /// Browse a shelf interactively
    Browse(commands::browse::BrowseArgs),
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Commands::Shelves => commands::shelves::run(&config),
        Commands::Ls(args) => commands::ls::run(&config, args).await,
        Commands::Browse(args) => commands::browse::run(&config, args).await,
    }
}
