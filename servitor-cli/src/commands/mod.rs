//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod domains;
mod run;
mod services;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a service
    Run {
        /// Service name (see `servitor services`)
        service: String,

        /// Parameters as key=value pairs (e.g., fqdn=example.com years=2)
        #[arg(short, long, value_parser = run::parse_key_val)]
        param: Vec<(String, String)>,

        /// Parameters as a JSON object; key=value pairs override its keys
        #[arg(long)]
        json: Option<String>,
    },
    /// List available services
    Services,
    /// List registered domains
    Domains,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run {
            service,
            param,
            json,
        } => run::run_service(config, &service, param, json.as_deref()),
        Commands::Services => services::list_services(),
        Commands::Domains => domains::list_domains(config),
    }
}
