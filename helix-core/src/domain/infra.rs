//! Infrastructure configuration types
//!
//! An [`InfrastructureConfig`] is rebuilt on every resolution and may be partial.
//! Submission needs the fully populated [`ResolvedInfrastructure`].

use serde::{Deserialize, Serialize};

/// Identifiers needed to submit a workflow run
///
/// Any field may be missing after resolution; callers check completeness with
/// [`InfrastructureConfig::resolved`] before submitting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureConfig {
    pub workflow_id: Option<String>,
    pub role_arn: Option<String>,
    pub bucket: Option<String>,
}

impl InfrastructureConfig {
    /// Names of the fields that are absent or empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.workflow_id) {
            missing.push("workflow_id");
        }
        if is_blank(&self.role_arn) {
            missing.push("role_arn");
        }
        if is_blank(&self.bucket) {
            missing.push("bucket");
        }
        missing
    }

    /// Returns the complete identifiers, or `None` if any field is missing
    pub fn resolved(&self) -> Option<ResolvedInfrastructure> {
        match (&self.workflow_id, &self.role_arn, &self.bucket) {
            (Some(workflow_id), Some(role_arn), Some(bucket))
                if !workflow_id.is_empty() && !role_arn.is_empty() && !bucket.is_empty() =>
            {
                Some(ResolvedInfrastructure {
                    workflow_id: workflow_id.clone(),
                    role_arn: role_arn.clone(),
                    bucket: bucket.clone(),
                })
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for InfrastructureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "<unset>".to_string());
        write!(
            f,
            "workflow_id={}, role_arn={}, bucket={}",
            show(&self.workflow_id),
            show(&self.role_arn),
            show(&self.bucket)
        )
    }
}

/// Fully populated infrastructure identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInfrastructure {
    pub workflow_id: String,
    pub role_arn: String,
    pub bucket: String,
}

/// Caller-pinned configuration
///
/// Each non-empty field beats whatever discovery finds. A new value replaces the
/// previous one wholesale; fields are never merged across sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    /// Name of the infrastructure stack to read outputs from
    pub stack_name: Option<String>,
    pub workflow_id: Option<String>,
    pub role_arn: Option<String>,
    pub bucket: Option<String>,
}

impl ConfigOverrides {
    /// Creates overrides that only pin the stack name
    pub fn for_stack(stack_name: impl Into<String>) -> Self {
        Self {
            stack_name: Some(stack_name.into()),
            ..Self::default()
        }
    }

    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }

    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.role_arn = Some(role_arn.into());
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> InfrastructureConfig {
        InfrastructureConfig {
            workflow_id: Some("1234567".to_string()),
            role_arn: Some("arn:aws:iam::111122223333:role/run".to_string()),
            bucket: Some("outputs".to_string()),
        }
    }

    #[test]
    fn test_complete_config_resolves() {
        let resolved = full().resolved().unwrap();
        assert_eq!(resolved.workflow_id, "1234567");
        assert_eq!(resolved.bucket, "outputs");
        assert!(full().missing_fields().is_empty());
    }

    #[test]
    fn test_empty_field_counts_as_missing() {
        let mut config = full();
        config.role_arn = Some(String::new());
        config.bucket = None;

        assert!(config.resolved().is_none());
        assert_eq!(config.missing_fields(), vec!["role_arn", "bucket"]);
    }

    #[test]
    fn test_overrides_builder() {
        let overrides = ConfigOverrides::for_stack("prod")
            .with_workflow_id("wf")
            .with_bucket("b");

        assert_eq!(overrides.stack_name.as_deref(), Some("prod"));
        assert_eq!(overrides.workflow_id.as_deref(), Some("wf"));
        assert_eq!(overrides.role_arn, None);
        assert_eq!(overrides.bucket.as_deref(), Some("b"));
    }
}
