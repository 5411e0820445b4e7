//! AWS backend
//!
//! Implements every backend trait on top of the AWS SDK:
//! - CloudFormation for stack outputs
//! - STS for the caller's account
//! - HealthOmics for workflow runs
//! - S3 for run outputs

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::{Document, Number};
use chrono::{DateTime, Utc};
use helix_core::domain::artifact::ObjectEntry;
use helix_core::domain::run::{RunRecord, RunStatus};
use helix_core::domain::submission::SubmissionRequest;
use helix_core::dto::identity::CallerIdentity;
use helix_core::dto::run::StartRunResponse;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::debug;

use super::{IdentityProvider, ObjectStore, StackOutputs, WorkflowService};
use crate::error::{ClientError, Result};

/// AWS SDK clients sharing one loaded configuration
#[derive(Debug, Clone)]
pub struct AwsBackend {
    cloudformation: aws_sdk_cloudformation::Client,
    sts: aws_sdk_sts::Client,
    omics: aws_sdk_omics::Client,
    s3: aws_sdk_s3::Client,
    region: Option<String>,
}

impl AwsBackend {
    /// Loads credentials and region from the default provider chain
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::from_sdk_config(&config)
    }

    /// Builds all clients from an already loaded configuration
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self {
            cloudformation: aws_sdk_cloudformation::Client::new(config),
            sts: aws_sdk_sts::Client::new(config),
            omics: aws_sdk_omics::Client::new(config),
            s3: aws_sdk_s3::Client::new(config),
            region: config.region().map(|region| region.to_string()),
        }
    }

    /// Region the clients talk to, if one is configured
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

#[async_trait]
impl StackOutputs for AwsBackend {
    async fn stack_outputs(&self, stack_name: &str) -> Result<HashMap<String, String>> {
        debug!("Describing stack {}", stack_name);

        let output = self
            .cloudformation
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| ClientError::StackLookup(DisplayErrorContext(&e).to_string()))?;

        let stack = output
            .stacks()
            .first()
            .ok_or_else(|| ClientError::StackLookup(format!("Stack {} not found", stack_name)))?;

        let outputs = stack
            .outputs()
            .iter()
            .filter_map(|output| {
                Some((
                    output.output_key()?.to_string(),
                    output.output_value()?.to_string(),
                ))
            })
            .collect();

        Ok(outputs)
    }
}

#[async_trait]
impl IdentityProvider for AwsBackend {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        let output = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| ClientError::Identity(DisplayErrorContext(&e).to_string()))?;

        let account_id = output
            .account()
            .ok_or_else(|| ClientError::Identity("Caller identity has no account".to_string()))?
            .to_string();

        let region = self
            .region
            .clone()
            .ok_or_else(|| ClientError::Identity("No AWS region configured".to_string()))?;

        Ok(CallerIdentity { account_id, region })
    }
}

#[async_trait]
impl WorkflowService for AwsBackend {
    async fn start_run(&self, request: &SubmissionRequest) -> Result<StartRunResponse> {
        let parameters = serde_json::to_value(&request.parameters).map_err(|e| {
            ClientError::Submission(format!("Failed to encode workflow parameters: {}", e))
        })?;

        let output = self
            .omics
            .start_run()
            .workflow_id(&request.workflow_id)
            .name(&request.run_name)
            .parameters(to_document(parameters))
            .output_uri(&request.output_uri)
            .role_arn(&request.role_arn)
            .send()
            .await
            .map_err(|e| ClientError::Submission(DisplayErrorContext(&e).to_string()))?;

        let run_id = output
            .id()
            .ok_or_else(|| ClientError::Submission("Service returned no run id".to_string()))?
            .to_string();

        Ok(StartRunResponse {
            run_id,
            status: to_run_status(output.status().map(|status| status.as_str())),
        })
    }

    async fn get_run(&self, run_id: &str) -> Result<RunRecord> {
        let output = self
            .omics
            .get_run()
            .id(run_id)
            .send()
            .await
            .map_err(|e| ClientError::Monitor(DisplayErrorContext(&e).to_string()))?;

        Ok(RunRecord {
            run_id: output.id().unwrap_or(run_id).to_string(),
            status: to_run_status(output.status().map(|status| status.as_str())),
            name: output.name().map(str::to_string),
            start_time: output.start_time().and_then(to_utc),
            stop_time: output.stop_time().and_then(to_utc),
            output_uri: output.output_uri().map(str::to_string),
            status_message: output.status_message().map(str::to_string),
        })
    }
}

#[async_trait]
impl ObjectStore for AwsBackend {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>> {
        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .s3
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| ClientError::Storage(DisplayErrorContext(&e).to_string()))?;

            for object in page.contents() {
                if let Some(key) = object.key() {
                    let size = object.size().unwrap_or(0).max(0) as u64;
                    entries.push(ObjectEntry::new(key, size));
                }
            }

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("Listed {} object(s) under s3://{}/{}", entries.len(), bucket, prefix);
        Ok(entries)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let output = self
            .s3
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| ClientError::Storage(DisplayErrorContext(&e).to_string()))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| ClientError::Storage(format!("Failed to read s3://{}/{}: {}", bucket, key, e)))?;

        Ok(bytes.into_bytes().to_vec())
    }
}

fn to_run_status(status: Option<&str>) -> RunStatus {
    match status {
        Some(status) => RunStatus::from(status),
        None => RunStatus::Unknown("UNKNOWN".to_string()),
    }
}

fn to_utc(time: &aws_smithy_types::DateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(time.secs(), time.subsec_nanos())
}

/// Converts a JSON value into the document type the Omics API expects
fn to_document(value: JsonValue) -> Document {
    match value {
        JsonValue::Null => Document::Null,
        JsonValue::Bool(flag) => Document::Bool(flag),
        JsonValue::Number(number) => {
            if let Some(value) = number.as_u64() {
                Document::Number(Number::PosInt(value))
            } else if let Some(value) = number.as_i64() {
                Document::Number(Number::NegInt(value))
            } else {
                Document::Number(Number::Float(number.as_f64().unwrap_or_default()))
            }
        }
        JsonValue::String(text) => Document::String(text),
        JsonValue::Array(items) => Document::Array(items.into_iter().map(to_document).collect()),
        JsonValue::Object(map) => Document::Object(
            map.into_iter()
                .map(|(key, value)| (key, to_document(value)))
                .collect(),
        ),
    }
}
