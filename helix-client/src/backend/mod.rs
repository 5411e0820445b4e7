//! Backend layer
//!
//! Backends are the narrow request/response seams to the outside world:
//! stack outputs, caller identity, the workflow execution service and the
//! object store. They carry no orchestration logic.
//!
//! All backends are trait-based so the orchestration code can be tested
//! against in-memory fakes.

mod aws;

use async_trait::async_trait;
use helix_core::domain::artifact::ObjectEntry;
use helix_core::domain::run::RunRecord;
use helix_core::domain::submission::SubmissionRequest;
use helix_core::dto::identity::CallerIdentity;
use helix_core::dto::run::StartRunResponse;
use std::collections::HashMap;

use crate::error::Result;

pub use aws::AwsBackend;

/// Reads the published outputs of a named infrastructure stack
#[async_trait]
pub trait StackOutputs: Send + Sync {
    /// Returns the stack's output keys mapped to their values
    ///
    /// # Arguments
    /// * `stack_name` - Name of the deployed stack
    async fn stack_outputs(&self, stack_name: &str) -> Result<HashMap<String, String>>;
}

/// Looks up who the current credentials belong to
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn caller_identity(&self) -> Result<CallerIdentity>;
}

/// Remote workflow execution service
#[async_trait]
pub trait WorkflowService: Send + Sync {
    /// Starts one workflow run
    async fn start_run(&self, request: &SubmissionRequest) -> Result<StartRunResponse>;

    /// Fetches the current state of a run
    ///
    /// # Arguments
    /// * `run_id` - Identifier returned by [`WorkflowService::start_run`]
    async fn get_run(&self, run_id: &str) -> Result<RunRecord>;
}

/// Object storage holding run outputs
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists every object under a key prefix
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>>;

    /// Downloads the full content of one object
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}
