//! Monitor command handler

use anyhow::Result;
use clap::Args;
use helix_client::WorkflowClient;
use helix_client::monitor::MonitorOptions;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Arguments for checking on a run
#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Run ID returned at submission
    pub run_id: String,

    /// Keep checking until the run finishes
    #[arg(short, long)]
    pub wait: bool,

    /// Seconds between checks while waiting
    #[arg(long, env = "HELIX_POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// Minutes to wait before giving up
    #[arg(long, env = "HELIX_MAX_WAIT_MINUTES")]
    pub max_wait: Option<u64>,
}

impl MonitorArgs {
    fn options(&self) -> MonitorOptions {
        MonitorOptions {
            wait_for_completion: Some(self.wait),
            poll_interval: self.poll_interval.map(Duration::from_secs),
            max_wait: self
                .max_wait
                .map(|minutes| Duration::from_secs(minutes.saturating_mul(60))),
        }
    }
}

/// Report on a run; Ctrl-C stops a wait and prints the last known status
pub async fn monitor_run(client: WorkflowClient, args: MonitorArgs) -> Result<()> {
    let token = CancellationToken::new();
    let client = client.with_cancellation(token.clone());

    let guard = token.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping wait");
            guard.cancel();
        }
    });

    let text = client.monitor(&args.run_id, args.options()).await;
    interrupt.abort();

    println!("{}", text);
    Ok(())
}
