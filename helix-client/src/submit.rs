//! Job submission
//!
//! Resolves configuration, normalizes inputs, composes the container image from
//! the caller's identity and starts exactly one workflow run.

use helix_core::domain::infra::ConfigOverrides;
use helix_core::domain::run::RunHandle;
use helix_core::domain::submission::{SubmissionInputs, SubmissionRequest, WorkflowParameters};
use helix_core::dto::identity::CallerIdentity;
use std::sync::Arc;
use tracing::info;

use crate::backend::{IdentityProvider, WorkflowService};
use crate::config::ConfigResolver;
use crate::error::{ClientError, Result};
use crate::params::ParameterNormalizer;

/// Repository holding the workflow container image
pub const IMAGE_REPOSITORY: &str = "protein-design-evoprotgrad";

pub const IMAGE_TAG: &str = "latest";

/// Characters of the sequence echoed back after submission
pub const SEQUENCE_PREVIEW_CHARS: usize = 20;

/// A started run together with the request that started it
#[derive(Debug, Clone)]
pub struct SubmittedRun {
    pub handle: RunHandle,
    pub request: SubmissionRequest,
}

impl SubmittedRun {
    /// Human-readable acknowledgement; the sequence is only previewed
    pub fn render(&self) -> String {
        let params = &self.request.parameters;

        [
            "Successfully started protein optimization workflow.".to_string(),
            String::new(),
            format!("Run ID: {}", self.handle.run_id),
            format!("Status: {}", self.handle.status),
            format!("Output URI: {}", self.handle.output_uri),
            String::new(),
            "Optimization parameters:".to_string(),
            format!(
                "- Seed sequence: {} ({} amino acids)",
                sequence_preview(&params.seed_sequence),
                params.seed_sequence.chars().count()
            ),
            format!("- Parallel chains: {}", params.parallel_chains),
            format!("- Steps per chain: {}", params.n_steps),
            format!("- Max mutations: {}", params.max_mutations),
            format!("- Output type: {}", params.output_type),
            String::new(),
            format!(
                "You can check the status later by asking me to 'monitor workflow run {}'",
                self.handle.run_id
            ),
        ]
        .join("\n")
    }
}

/// Submits workflow runs
#[derive(Clone)]
pub struct JobSubmitter {
    resolver: ConfigResolver,
    identity: Arc<dyn IdentityProvider>,
    workflows: Arc<dyn WorkflowService>,
    normalizer: ParameterNormalizer,
}

impl JobSubmitter {
    pub fn new(
        resolver: ConfigResolver,
        identity: Arc<dyn IdentityProvider>,
        workflows: Arc<dyn WorkflowService>,
    ) -> Self {
        Self {
            resolver,
            identity,
            workflows,
            normalizer: ParameterNormalizer::new(),
        }
    }

    /// Starts one run
    ///
    /// Validation and configuration failures return before any external call
    /// other than the stack lookup.
    ///
    /// # Arguments
    /// * `inputs` - Raw submission inputs
    /// * `overrides` - Caller-pinned configuration
    pub async fn submit(
        &self,
        inputs: &SubmissionInputs,
        overrides: &ConfigOverrides,
    ) -> Result<SubmittedRun> {
        let config = self.resolver.resolve(overrides).await;
        let normalized = self.normalizer.normalize(inputs, &config)?;
        let infra = config.resolved().ok_or_else(|| ClientError::Configuration {
            missing: config.missing_fields(),
        })?;

        let identity = self.identity.caller_identity().await?;

        let request = SubmissionRequest {
            workflow_id: infra.workflow_id,
            role_arn: infra.role_arn,
            run_name: normalized.run_name,
            output_uri: normalized.output_uri,
            parameters: WorkflowParameters::new(container_image(&identity), normalized.parameters),
        };

        info!(
            "Starting run {} of workflow {}",
            request.run_name, request.workflow_id
        );
        let response = self.workflows.start_run(&request).await?;
        info!("Run {} started with status {}", response.run_id, response.status);

        Ok(SubmittedRun {
            handle: RunHandle {
                run_id: response.run_id,
                status: response.status,
                output_uri: request.output_uri.clone(),
            },
            request,
        })
    }
}

/// ECR image reference for the caller's account and region
pub fn container_image(identity: &CallerIdentity) -> String {
    format!(
        "{}.dkr.ecr.{}.amazonaws.com/{}:{}",
        identity.account_id, identity.region, IMAGE_REPOSITORY, IMAGE_TAG
    )
}

fn sequence_preview(sequence: &str) -> String {
    if sequence.chars().count() <= SEQUENCE_PREVIEW_CHARS {
        return sequence.to_string();
    }
    let preview: String = sequence.chars().take(SEQUENCE_PREVIEW_CHARS).collect();
    format!("{}...", preview)
}
