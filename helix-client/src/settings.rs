//! Client settings
//!
//! Defines the deployment conventions used during resolution and the timing
//! used by the waiting monitor. Both can be loaded from environment variables.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Stack consulted when neither the caller nor the environment names one
pub const DEFAULT_STACK_NAME: &str = "pppp";

/// Bucket used when nothing else provides one
pub const DEFAULT_BUCKET: &str = "asadrad-multimodal-us-east-1";

/// Stack output holding the workflow identifier
pub const WORKFLOW_OUTPUT_KEY: &str = "WorkflowId";

/// Stack output holding the execution role ARN
pub const ROLE_OUTPUT_KEY: &str = "WorkflowExecutionRoleArn";

/// Settings for infrastructure resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Stack name used when the overrides carry none
    pub stack_name: String,

    /// Lowest-precedence bucket
    pub default_bucket: String,

    /// Output key scanned for the workflow id
    pub workflow_output_key: String,

    /// Output key scanned for the role ARN
    pub role_output_key: String,
}

impl ResolverSettings {
    /// Creates settings from environment variables
    ///
    /// Recognized variables:
    /// - STACK_NAME (optional, default: "pppp")
    /// - HELIX_DEFAULT_BUCKET (optional)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates settings from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut settings = Self::default();
        if let Some(stack_name) = non_empty("STACK_NAME") {
            settings.stack_name = stack_name;
        }
        if let Some(bucket) = non_empty("HELIX_DEFAULT_BUCKET") {
            settings.default_bucket = bucket;
        }
        settings
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            default_bucket: DEFAULT_BUCKET.to_string(),
            workflow_output_key: WORKFLOW_OUTPUT_KEY.to_string(),
            role_output_key: ROLE_OUTPUT_KEY.to_string(),
        }
    }
}

/// Timing for the waiting monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Time between status checks
    pub poll_interval: Duration,

    /// Upper bound on the total wait
    pub max_wait: Duration,
}

impl MonitorSettings {
    /// Creates settings from environment variables
    ///
    /// Recognized variables:
    /// - HELIX_POLL_INTERVAL (optional, seconds, default: 30)
    /// - HELIX_MAX_WAIT_MINUTES (optional, minutes, default: 30)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates settings from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let poll_interval = lookup("HELIX_POLL_INTERVAL")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);

        let max_wait = lookup("HELIX_MAX_WAIT_MINUTES")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .and_then(|minutes| minutes.checked_mul(60))
            .map(Duration::from_secs)
            .unwrap_or(defaults.max_wait);

        Self {
            poll_interval,
            max_wait,
        }
    }

    /// Validates the settings
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(ClientError::validation("poll_interval must be greater than 0"));
        }

        if self.max_wait.is_zero() {
            return Err(ClientError::validation("max_wait must be greater than 0"));
        }

        Ok(())
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            max_wait: Duration::from_secs(30 * 60),
        }
    }
}
