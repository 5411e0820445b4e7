//! Submission parameter normalization
//!
//! Turns raw [`SubmissionInputs`] into a [`NormalizedSubmission`]. The sequence is
//! validated strictly. Numeric fields are lenient: anything that is not a
//! positive integer becomes the default instead of an error.

use helix_core::domain::infra::InfrastructureConfig;
use helix_core::domain::submission::{
    JobParameters, NormalizedSubmission, NumericInput, OutputSelector, SubmissionInputs,
};
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// The 20 standard amino acid codes
pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

pub const DEFAULT_PARALLEL_CHAINS: u32 = 10;
pub const DEFAULT_N_STEPS: u32 = 100;
pub const DEFAULT_MAX_MUTATIONS: u32 = 15;

/// Prefix of generated run names
pub const RUN_NAME_PREFIX: &str = "workflow-run-";

/// Default primary model directory, relative to the bucket
pub const DEFAULT_ESM_MODEL_PATH: &str = "models/esm2_t6_8M_UR50D/";

/// Validates and fills in submission inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterNormalizer;

impl ParameterNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalizes inputs against a resolved configuration
    ///
    /// Sequence problems are reported before configuration problems.
    pub fn normalize(
        &self,
        inputs: &SubmissionInputs,
        config: &InfrastructureConfig,
    ) -> Result<NormalizedSubmission> {
        let seed_sequence = validate_sequence(&inputs.sequence)?;

        let infra = config.resolved().ok_or_else(|| ClientError::Configuration {
            missing: config.missing_fields(),
        })?;

        let run_name = non_empty(&inputs.run_name)
            .map(str::to_string)
            .unwrap_or_else(generate_run_name);

        let output_uri = non_empty(&inputs.output_uri)
            .map(str::to_string)
            .unwrap_or_else(|| format!("s3://{}/outputs/{}/", infra.bucket, run_name));

        let esm_model_files = non_empty(&inputs.esm_model_files)
            .map(str::to_string)
            .unwrap_or_else(|| format!("s3://{}/{}", infra.bucket, DEFAULT_ESM_MODEL_PATH));

        let output_type = non_empty(&inputs.output_type)
            .map(OutputSelector::from)
            .unwrap_or_default();

        Ok(NormalizedSubmission {
            run_name,
            output_uri,
            parameters: JobParameters {
                seed_sequence,
                esm_model_files,
                onehotcnn_model_files: non_empty(&inputs.onehotcnn_model_files)
                    .map(str::to_string),
                output_type,
                parallel_chains: coerce(&inputs.parallel_chains, DEFAULT_PARALLEL_CHAINS),
                n_steps: coerce(&inputs.n_steps, DEFAULT_N_STEPS),
                max_mutations: coerce(&inputs.max_mutations, DEFAULT_MAX_MUTATIONS),
            },
        })
    }
}

/// Checks the sequence alphabet and returns it upper-cased
pub fn validate_sequence(sequence: &str) -> Result<String> {
    if sequence.is_empty() {
        return Err(ClientError::validation("seed_sequence is required"));
    }

    if !sequence.chars().all(is_amino_acid) {
        return Err(ClientError::validation(
            "Invalid amino acid sequence. Only standard 20 amino acids are allowed.",
        ));
    }

    Ok(sequence.to_ascii_uppercase())
}

fn is_amino_acid(c: char) -> bool {
    c.is_ascii() && AMINO_ACIDS.contains(c.to_ascii_uppercase())
}

/// `workflow-run-` followed by 8 random hex characters
pub fn generate_run_name() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}{}", RUN_NAME_PREFIX, &id[..8])
}

fn coerce(value: &Option<NumericInput>, default: u32) -> u32 {
    value
        .as_ref()
        .and_then(NumericInput::positive_integer)
        .unwrap_or(default)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
