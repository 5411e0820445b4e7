//! Run monitoring
//!
//! By default a call performs exactly one status query. Callers that want to
//! block can opt into waiting: the monitor then re-checks on an interval until
//! the run settles, the max wait elapses or the cancellation token fires. In
//! every case the last known status is rendered.

use helix_core::domain::run::{RunRecord, RunStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::WorkflowService;
use crate::error::Result;
use crate::results::ResultAggregator;
use crate::settings::MonitorSettings;

/// Per-call monitoring options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorOptions {
    /// Keep polling until the run settles (default: single check)
    pub wait_for_completion: Option<bool>,

    /// Time between checks while waiting
    pub poll_interval: Option<Duration>,

    /// Upper bound on the wait
    pub max_wait: Option<Duration>,
}

impl MonitorOptions {
    /// Options that wait with the configured timing
    pub fn waiting() -> Self {
        Self {
            wait_for_completion: Some(true),
            ..Self::default()
        }
    }
}

/// How a wait ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The run reached a terminal status
    Settled(RunRecord),
    /// The max wait elapsed first
    TimedOut(RunRecord),
    /// The cancellation token fired first
    Cancelled(RunRecord),
}

impl WaitOutcome {
    /// Last status record observed
    pub fn record(&self) -> &RunRecord {
        match self {
            WaitOutcome::Settled(record)
            | WaitOutcome::TimedOut(record)
            | WaitOutcome::Cancelled(record) => record,
        }
    }
}

/// Queries run status and reports results
#[derive(Clone)]
pub struct JobMonitor {
    workflows: Arc<dyn WorkflowService>,
    aggregator: ResultAggregator,
    settings: MonitorSettings,
    cancellation: CancellationToken,
}

impl JobMonitor {
    pub fn new(
        workflows: Arc<dyn WorkflowService>,
        aggregator: ResultAggregator,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            workflows,
            aggregator,
            settings,
            cancellation: CancellationToken::new(),
        }
    }

    /// Uses an external token to abort waits early
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Reports on a run; never fails
    ///
    /// # Arguments
    /// * `run_id` - Identifier returned at submission
    /// * `options` - Single check (default) or wait
    pub async fn monitor(&self, run_id: &str, options: MonitorOptions) -> String {
        if run_id.is_empty() {
            return "Error: runId parameter is required".to_string();
        }

        let result = if options.wait_for_completion.unwrap_or(false) {
            self.wait_and_render(run_id, &options).await
        } else {
            self.check(run_id).await
        };

        result.unwrap_or_else(|e| format!("Error monitoring workflow: {}", e))
    }

    /// Performs a single status query and renders it
    pub async fn check(&self, run_id: &str) -> Result<String> {
        let record = self.workflows.get_run(run_id).await?;
        info!("Run {} is {}", run_id, record.status);
        Ok(self.render(run_id, &record).await)
    }

    /// Polls until the run settles, the wait times out or it is cancelled
    ///
    /// Query failures end the wait; there are no retries.
    pub async fn wait_until_settled(
        &self,
        run_id: &str,
        poll_interval: Duration,
        max_wait: Duration,
    ) -> Result<WaitOutcome> {
        // A wait too long to represent has no deadline
        let deadline = Instant::now().checked_add(max_wait);

        loop {
            let record = self.workflows.get_run(run_id).await?;
            if record.status.is_terminal() {
                info!("Run {} settled as {}", run_id, record.status);
                return Ok(WaitOutcome::Settled(record));
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        info!("Stopped waiting for run {} after {:?}", run_id, max_wait);
                        return Ok(WaitOutcome::TimedOut(record));
                    }
                    poll_interval.min(deadline - now)
                }
                None => poll_interval,
            };
            debug!("Run {} is {}, checking again in {:?}", run_id, record.status, pause);

            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => {
                    info!("Wait for run {} cancelled", run_id);
                    return Ok(WaitOutcome::Cancelled(record));
                }
                _ = time::sleep(pause) => {}
            }
        }
    }

    async fn wait_and_render(&self, run_id: &str, options: &MonitorOptions) -> Result<String> {
        let timing = MonitorSettings {
            poll_interval: options.poll_interval.unwrap_or(self.settings.poll_interval),
            max_wait: options.max_wait.unwrap_or(self.settings.max_wait),
        };
        timing.validate()?;

        let outcome = self
            .wait_until_settled(run_id, timing.poll_interval, timing.max_wait)
            .await?;
        let mut text = self.render(run_id, outcome.record()).await;

        match outcome {
            WaitOutcome::Settled(_) => {}
            WaitOutcome::TimedOut(_) => {
                text.push_str(&format!(
                    "\n\nStopped waiting after {}; the run has not finished.",
                    describe_wait(timing.max_wait)
                ));
            }
            WaitOutcome::Cancelled(_) => {
                text.push_str("\n\nWaiting was cancelled before the run finished.");
            }
        }

        Ok(text)
    }

    async fn render(&self, run_id: &str, record: &RunRecord) -> String {
        let mut text = format!("Run ID: {}\nCurrent Status: {}\n", run_id, record.status);
        if let Some(name) = &record.name {
            text.push_str(&format!("Run Name: {}\n", name));
        }
        if let Some(start_time) = record.start_time {
            text.push_str(&format!("Start Time: {}\n", start_time.to_rfc3339()));
        }

        match record.status {
            RunStatus::Completed => {
                text.push_str(&self.aggregator.collect(record).await);
            }
            RunStatus::Failed => {
                let message = record.status_message.as_deref().unwrap_or("None");
                text.push_str(&format!("Failed with message: {}\n", message));
            }
            _ => {
                text.push_str(
                    "\nThe workflow is still running. You can check again later with the same run ID.\n",
                );
                text.push_str(&format!(
                    "To check again, ask me to 'monitor workflow run {}'.",
                    run_id
                ));
            }
        }

        text
    }
}

/// Whole minutes when the wait is a multiple of a minute, seconds otherwise
fn describe_wait(wait: Duration) -> String {
    let secs = wait.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{} minute(s)", secs / 60)
    } else {
        format!("{} second(s)", secs)
    }
}
