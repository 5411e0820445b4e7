//! Infrastructure configuration resolution
//!
//! Merges, lowest to highest precedence:
//! 1. The default bucket from [`ResolverSettings`]
//! 2. Outputs of the infrastructure stack (named by the overrides, else the environment)
//! 3. Caller overrides
//!
//! Resolution never fails. A failed stack lookup leaves the identifiers it would
//! have provided unset; submission detects that later.

use helix_core::domain::infra::{ConfigOverrides, InfrastructureConfig};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::StackOutputs;
use crate::settings::ResolverSettings;

/// Resolves [`InfrastructureConfig`] from layered sources
#[derive(Clone)]
pub struct ConfigResolver {
    stacks: Arc<dyn StackOutputs>,
    settings: ResolverSettings,
}

impl ConfigResolver {
    pub fn new(stacks: Arc<dyn StackOutputs>, settings: ResolverSettings) -> Self {
        Self { stacks, settings }
    }

    /// Stack that resolution reads for the given overrides
    pub fn stack_name<'a>(&'a self, overrides: &'a ConfigOverrides) -> &'a str {
        non_empty(&overrides.stack_name).unwrap_or(&self.settings.stack_name)
    }

    /// Resolves the configuration
    ///
    /// # Arguments
    /// * `overrides` - Caller-pinned values; non-empty fields win over discovery
    pub async fn resolve(&self, overrides: &ConfigOverrides) -> InfrastructureConfig {
        let mut config = InfrastructureConfig {
            workflow_id: None,
            role_arn: None,
            bucket: Some(self.settings.default_bucket.clone()),
        };

        let stack_name = self.stack_name(overrides);
        match self.stacks.stack_outputs(stack_name).await {
            Ok(outputs) => {
                debug!("Stack {} published {} output(s)", stack_name, outputs.len());
                if let Some(value) = outputs
                    .get(&self.settings.workflow_output_key)
                    .filter(|v| !v.is_empty())
                {
                    config.workflow_id = Some(value.clone());
                }
                if let Some(value) = outputs
                    .get(&self.settings.role_output_key)
                    .filter(|v| !v.is_empty())
                {
                    config.role_arn = Some(value.clone());
                }
            }
            Err(e) => {
                warn!("Error getting stack outputs for {}: {}", stack_name, e);
            }
        }

        if let Some(value) = non_empty(&overrides.workflow_id) {
            config.workflow_id = Some(value.to_string());
        }
        if let Some(value) = non_empty(&overrides.role_arn) {
            config.role_arn = Some(value.to_string());
        }
        if let Some(value) = non_empty(&overrides.bucket) {
            config.bucket = Some(value.to_string());
        }

        config
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
