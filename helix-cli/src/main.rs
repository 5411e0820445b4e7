//! Helix CLI
//!
//! Command-line interface for submitting and monitoring protein-design workflow runs.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "helix")]
#[command(about = "Protein design workflow CLI", long_about = None)]
struct Cli {
    /// Infrastructure stack to read workflow outputs from
    #[arg(long, global = true, env = "STACK_NAME")]
    stack_name: Option<String>,

    /// Workflow id, overriding the stack output
    #[arg(long, global = true, env = "HELIX_WORKFLOW_ID")]
    workflow_id: Option<String>,

    /// Execution role ARN, overriding the stack output
    #[arg(long, global = true, env = "HELIX_ROLE_ARN")]
    role_arn: Option<String>,

    /// Bucket for run outputs and models
    #[arg(long, global = true, env = "HELIX_BUCKET")]
    bucket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helix_cli=info,helix_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        stack_name: cli.stack_name,
        workflow_id: cli.workflow_id,
        role_arn: cli.role_arn,
        bucket: cli.bucket,
    };

    handle_command(cli.command, &config).await
}
