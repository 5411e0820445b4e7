//! Configuration module
//!
//! Holds the infrastructure values pinned on the command line or through the
//! environment.

use helix_core::domain::infra::ConfigOverrides;

/// CLI configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Stack whose outputs provide the workflow identifiers
    pub stack_name: Option<String>,
    pub workflow_id: Option<String>,
    pub role_arn: Option<String>,
    pub bucket: Option<String>,
}

impl Config {
    /// Overrides handed to the client; blank values are dropped
    pub fn overrides(&self) -> ConfigOverrides {
        let keep = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        ConfigOverrides {
            stack_name: keep(&self.stack_name),
            workflow_id: keep(&self.workflow_id),
            role_arn: keep(&self.role_arn),
            bucket: keep(&self.bucket),
        }
    }
}
