//! Servitor CLI
//!
//! Command-line interface for running domain services against a registry
//! file.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "servitor")]
#[command(about = "Run service objects from the command line", long_about = None)]
struct Cli {
    /// JSON file holding the registry records
    #[arg(long, env = "SERVITOR_REGISTRY")]
    registry: Option<PathBuf>,

    /// Write the registry back to its file after a successful run
    #[arg(long)]
    persist: bool,

    /// TLDs the registry offers (comma-separated)
    #[arg(long, env = "SERVITOR_TLDS", value_delimiter = ',')]
    tlds: Vec<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "SERVITOR_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::new(cli.registry, cli.persist, cli.tlds);
    config.validate()?;

    handle_command(cli.command, &config)
}
