//! Submission types
//!
//! Raw caller inputs, the normalized parameter set and the request sent to the
//! execution service.

use serde::{Deserialize, Serialize};

/// A numeric input as supplied by a caller: either text or a JSON number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    /// Interprets the input as a positive integer
    ///
    /// Text is trimmed before parsing. Numbers must be whole. Zero, negative
    /// and fractional values yield `None`.
    pub fn positive_integer(&self) -> Option<u32> {
        let value = match self {
            NumericInput::Text(text) => text.trim().parse::<u64>().ok()?,
            NumericInput::Number(number) => match number.as_u64() {
                Some(value) => value,
                None => {
                    let float = number.as_f64()?;
                    if float.fract() != 0.0 || float < 1.0 || float > u32::MAX as f64 {
                        return None;
                    }
                    float as u64
                }
            },
        };

        if value == 0 {
            return None;
        }
        u32::try_from(value).ok()
    }
}

impl From<u32> for NumericInput {
    fn from(value: u32) -> Self {
        NumericInput::Number(value.into())
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(value: String) -> Self {
        NumericInput::Text(value)
    }
}

/// Which variants the workflow should emit
///
/// Unknown selectors are kept verbatim; the workflow decides what they mean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputSelector {
    Best,
    Last,
    #[default]
    All,
    Other(String),
}

impl OutputSelector {
    pub fn as_str(&self) -> &str {
        match self {
            OutputSelector::Best => "best",
            OutputSelector::Last => "last",
            OutputSelector::All => "all",
            OutputSelector::Other(value) => value,
        }
    }
}

impl From<String> for OutputSelector {
    fn from(value: String) -> Self {
        match value.as_str() {
            "best" => OutputSelector::Best,
            "last" => OutputSelector::Last,
            "all" => OutputSelector::All,
            _ => OutputSelector::Other(value),
        }
    }
}

impl From<&str> for OutputSelector {
    fn from(value: &str) -> Self {
        OutputSelector::from(value.to_string())
    }
}

impl From<OutputSelector> for String {
    fn from(value: OutputSelector) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for OutputSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw submission inputs; only the sequence is mandatory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionInputs {
    /// Seed protein sequence, any case
    pub sequence: String,
    pub run_name: Option<String>,
    pub output_uri: Option<String>,
    /// Primary model reference (S3 directory)
    pub esm_model_files: Option<String>,
    /// Secondary predictor model reference (S3 directory)
    pub onehotcnn_model_files: Option<String>,
    pub output_type: Option<String>,
    pub parallel_chains: Option<NumericInput>,
    pub n_steps: Option<NumericInput>,
    pub max_mutations: Option<NumericInput>,
}

impl SubmissionInputs {
    pub fn new(sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            ..Self::default()
        }
    }
}

/// Workflow parameters without the container image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParameters {
    /// Upper-cased, validated sequence
    pub seed_sequence: String,
    pub esm_model_files: String,
    pub onehotcnn_model_files: Option<String>,
    pub output_type: OutputSelector,
    pub parallel_chains: u32,
    pub n_steps: u32,
    pub max_mutations: u32,
}

/// Output of parameter normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSubmission {
    pub run_name: String,
    pub output_uri: String,
    pub parameters: JobParameters,
}

/// Parameter map sent to the execution service
///
/// Field names are the workflow's parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowParameters {
    pub container_image: String,
    pub seed_sequence: String,
    pub esm_model_files: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onehotcnn_model_files: Option<String>,
    pub output_type: OutputSelector,
    pub parallel_chains: u32,
    pub n_steps: u32,
    pub max_mutations: u32,
}

impl WorkflowParameters {
    /// Attaches a container image to normalized job parameters
    pub fn new(container_image: impl Into<String>, parameters: JobParameters) -> Self {
        Self {
            container_image: container_image.into(),
            seed_sequence: parameters.seed_sequence,
            esm_model_files: parameters.esm_model_files,
            onehotcnn_model_files: parameters.onehotcnn_model_files,
            output_type: parameters.output_type,
            parallel_chains: parameters.parallel_chains,
            n_steps: parameters.n_steps,
            max_mutations: parameters.max_mutations,
        }
    }
}

/// A single run submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub workflow_id: String,
    pub role_arn: String,
    pub run_name: String,
    pub output_uri: String,
    pub parameters: WorkflowParameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_text_inputs() {
        assert_eq!(NumericInput::from("25").positive_integer(), Some(25));
        assert_eq!(NumericInput::from(" 7 ").positive_integer(), Some(7));
        assert_eq!(NumericInput::from("abc").positive_integer(), None);
        assert_eq!(NumericInput::from("2.5").positive_integer(), None);
        assert_eq!(NumericInput::from("0").positive_integer(), None);
        assert_eq!(NumericInput::from("-4").positive_integer(), None);
    }

    #[test]
    fn test_numeric_number_inputs() {
        assert_eq!(NumericInput::from(12).positive_integer(), Some(12));

        let whole: NumericInput = serde_json::from_str("40.0").unwrap();
        assert_eq!(whole.positive_integer(), Some(40));

        let fractional: NumericInput = serde_json::from_str("40.5").unwrap();
        assert_eq!(fractional.positive_integer(), None);

        let negative: NumericInput = serde_json::from_str("-3").unwrap();
        assert_eq!(negative.positive_integer(), None);
    }

    #[test]
    fn test_numeric_input_deserializes_text_and_numbers() {
        let text: NumericInput = serde_json::from_str("\"15\"").unwrap();
        assert_eq!(text, NumericInput::Text("15".to_string()));

        let number: NumericInput = serde_json::from_str("15").unwrap();
        assert!(matches!(number, NumericInput::Number(_)));
    }

    #[test]
    fn test_output_selector_passes_unknown_values_through() {
        assert_eq!(OutputSelector::from("best"), OutputSelector::Best);
        assert_eq!(OutputSelector::from("last"), OutputSelector::Last);
        assert_eq!(OutputSelector::from("top5").as_str(), "top5");
        assert_eq!(OutputSelector::default().as_str(), "all");
    }

    #[test]
    fn test_workflow_parameters_omit_missing_predictor() {
        let params = WorkflowParameters::new(
            "image:latest",
            JobParameters {
                seed_sequence: "MKV".to_string(),
                esm_model_files: "s3://b/models/".to_string(),
                onehotcnn_model_files: None,
                output_type: OutputSelector::Best,
                parallel_chains: 10,
                n_steps: 100,
                max_mutations: 15,
            },
        );

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["output_type"], "best");
        assert_eq!(value["n_steps"], 100);
        assert!(value.get("onehotcnn_model_files").is_none());
    }
}
