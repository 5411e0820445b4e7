//! Helix Workflow Client
//!
//! Submits protein-design workflow runs to a managed execution service and
//! reports on them later.
//!
//! The client discovers its infrastructure identifiers from a deployed stack,
//! validates submission inputs, starts exactly one run per submission and, for
//! completed runs, summarizes the text artifacts found under the run's output
//! location.
//!
//! # Example
//!
//! ```no_run
//! use helix_client::WorkflowClient;
//! use helix_client::monitor::MonitorOptions;
//! use helix_core::domain::submission::SubmissionInputs;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = WorkflowClient::from_env().await;
//!
//!     // Start a run
//!     let text = client.submit(&SubmissionInputs::new("MKTAYIAKQRQISFVKSHFSRQ")).await;
//!     println!("{}", text);
//!
//!     // Later: check on it
//!     let text = client.monitor("1234567", MonitorOptions::default()).await;
//!     println!("{}", text);
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod monitor;
pub mod params;
pub mod results;
pub mod settings;
pub mod submit;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use helix_core::domain::infra::{ConfigOverrides, InfrastructureConfig};

use backend::{AwsBackend, IdentityProvider, ObjectStore, StackOutputs, WorkflowService};
use config::ConfigResolver;
use helix_core::domain::submission::SubmissionInputs;
use monitor::{JobMonitor, MonitorOptions, WaitOutcome};
use results::ResultAggregator;
use settings::{MonitorSettings, ResolverSettings};
use std::sync::Arc;
use submit::{JobSubmitter, SubmittedRun};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// The four external services the client talks to
#[derive(Clone)]
pub struct Backends {
    pub stacks: Arc<dyn StackOutputs>,
    pub identity: Arc<dyn IdentityProvider>,
    pub workflows: Arc<dyn WorkflowService>,
    pub objects: Arc<dyn ObjectStore>,
}

impl Backends {
    /// Uses one AWS backend for every service
    pub fn aws(backend: AwsBackend) -> Self {
        let backend = Arc::new(backend);
        Self {
            stacks: backend.clone(),
            identity: backend.clone(),
            workflows: backend.clone(),
            objects: backend,
        }
    }
}

/// Entry point for submitting and monitoring workflow runs
///
/// Owns the caller's [`ConfigOverrides`]; every operation resolves the
/// infrastructure configuration afresh against them.
#[derive(Clone)]
pub struct WorkflowClient {
    resolver: ConfigResolver,
    submitter: JobSubmitter,
    monitor: JobMonitor,
    monitor_settings: MonitorSettings,
    overrides: ConfigOverrides,
}

impl WorkflowClient {
    /// Create a client over explicit backends
    ///
    /// # Arguments
    /// * `backends` - Services used for discovery, submission and results
    /// * `resolver_settings` - Stack and bucket conventions
    /// * `monitor_settings` - Timing used when waiting for a run
    pub fn new(
        backends: Backends,
        resolver_settings: ResolverSettings,
        monitor_settings: MonitorSettings,
    ) -> Self {
        let resolver = ConfigResolver::new(backends.stacks, resolver_settings);
        let submitter = JobSubmitter::new(
            resolver.clone(),
            backends.identity,
            backends.workflows.clone(),
        );
        let monitor = JobMonitor::new(
            backends.workflows,
            ResultAggregator::new(backends.objects),
            monitor_settings,
        );

        Self {
            resolver,
            submitter,
            monitor,
            monitor_settings,
            overrides: ConfigOverrides::default(),
        }
    }

    /// Create a client from the AWS default provider chain and environment settings
    pub async fn from_env() -> Self {
        let backend = AwsBackend::from_env().await;
        if backend.region().is_none() {
            warn!("No AWS region configured; service calls will fail");
        }

        Self::new(
            Backends::aws(backend),
            ResolverSettings::from_env(),
            MonitorSettings::from_env(),
        )
    }

    /// Replace the overrides, consuming the client
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the overrides; the previous value is discarded, not merged
    pub fn set_overrides(&mut self, overrides: ConfigOverrides) {
        self.overrides = overrides;
    }

    /// Abort waits when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.monitor = self.monitor.with_cancellation(token);
        self
    }

    // =============================================================================
    // Configuration
    // =============================================================================

    /// Resolve the infrastructure configuration for the current overrides
    pub async fn resolve_config(&self) -> InfrastructureConfig {
        self.resolver.resolve(&self.overrides).await
    }

    /// Render the resolved configuration
    pub async fn describe_config(&self) -> String {
        let config = self.resolve_config().await;
        let mut text = format!(
            "Stack config: {} (stack: {})",
            config,
            self.resolver.stack_name(&self.overrides)
        );

        let missing = config.missing_fields();
        if !missing.is_empty() {
            text.push_str(&format!("\nMissing: {}", missing.join(", ")));
        }
        text
    }

    // =============================================================================
    // Submission
    // =============================================================================

    /// Submit one run and return the typed result
    pub async fn try_submit(&self, inputs: &SubmissionInputs) -> Result<SubmittedRun> {
        self.submitter.submit(inputs, &self.overrides).await
    }

    /// Submit one run and render the outcome; never fails
    pub async fn submit(&self, inputs: &SubmissionInputs) -> String {
        match self.try_submit(inputs).await {
            Ok(run) => run.render(),
            Err(e) => {
                warn!("Submission failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }

    // =============================================================================
    // Monitoring
    // =============================================================================

    /// Report on a run; never fails
    ///
    /// # Arguments
    /// * `run_id` - Identifier returned at submission
    /// * `options` - Single check by default; see [`MonitorOptions`]
    pub async fn monitor(&self, run_id: &str, options: MonitorOptions) -> String {
        self.monitor.monitor(run_id, options).await
    }

    /// Wait for a run with the configured timing and return how the wait ended
    pub async fn monitor_until_settled(&self, run_id: &str) -> Result<WaitOutcome> {
        self.monitor_settings.validate()?;
        self.monitor
            .wait_until_settled(
                run_id,
                self.monitor_settings.poll_interval,
                self.monitor_settings.max_wait,
            )
            .await
    }
}
