//! Submit command handler

use anyhow::{Result, bail};
use clap::Args;
use colored::*;
use helix_client::{ClientError, WorkflowClient};
use helix_core::domain::submission::SubmissionInputs;

/// Arguments for starting a run
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Seed protein sequence (standard amino acid letters, any case)
    pub sequence: String,

    /// Run name (default: generated)
    #[arg(long)]
    pub run_name: Option<String>,

    /// Output location (default: s3://<bucket>/outputs/<run name>/)
    #[arg(long)]
    pub output_uri: Option<String>,

    /// Primary model files location
    #[arg(long)]
    pub esm_model_files: Option<String>,

    /// Secondary predictor model files location
    #[arg(long)]
    pub onehotcnn_model_files: Option<String>,

    /// Which results to keep: best, last or all
    #[arg(long)]
    pub output_type: Option<String>,

    /// Number of parallel chains
    #[arg(long)]
    pub parallel_chains: Option<String>,

    /// Steps per chain
    #[arg(long)]
    pub n_steps: Option<String>,

    /// Maximum mutations per variant
    #[arg(long)]
    pub max_mutations: Option<String>,
}

impl From<SubmitArgs> for SubmissionInputs {
    fn from(args: SubmitArgs) -> Self {
        SubmissionInputs {
            sequence: args.sequence,
            run_name: args.run_name,
            output_uri: args.output_uri,
            esm_model_files: args.esm_model_files,
            onehotcnn_model_files: args.onehotcnn_model_files,
            output_type: args.output_type,
            parallel_chains: args.parallel_chains.map(Into::into),
            n_steps: args.n_steps.map(Into::into),
            max_mutations: args.max_mutations.map(Into::into),
        }
    }
}

/// Start a run and print the acknowledgement
pub async fn submit_run(client: &WorkflowClient, args: SubmitArgs) -> Result<()> {
    let inputs = SubmissionInputs::from(args);

    match client.try_submit(&inputs).await {
        Ok(run) => {
            eprintln!("{}", format!("✓ Started run {}", run.handle.run_id).green());
            println!("{}", run.render());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", failure_notice(&e).red());
            bail!(e)
        }
    }
}

/// One-line hint on where a submission failed
fn failure_notice(err: &ClientError) -> &'static str {
    if err.is_input_error() {
        "✗ Submission rejected before reaching the service"
    } else {
        "✗ Submission failed"
    }
}
