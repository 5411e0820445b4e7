//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod inspect;
mod monitor;
mod submit;

pub use monitor::MonitorArgs;
pub use submit::SubmitArgs;

use anyhow::Result;
use clap::Subcommand;
use helix_client::WorkflowClient;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the resolved infrastructure configuration
    Config,
    /// Start a protein optimization run
    Submit(SubmitArgs),
    /// Check on a run, optionally waiting for it to finish
    Monitor(MonitorArgs),
}

/// Handle a CLI command
///
/// Builds the workflow client from the environment and routes the command to
/// its handler.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = WorkflowClient::from_env()
        .await
        .with_overrides(config.overrides());

    match command {
        Commands::Config => inspect::show_config(&client).await,
        Commands::Submit(args) => submit::submit_run(&client, args).await,
        Commands::Monitor(args) => monitor::monitor_run(client, args).await,
    }
}
