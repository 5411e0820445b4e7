//! Error types for the Helix client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while resolving, submitting or monitoring a run
///
/// Public entry points render these to text once; everything below them
/// propagates the typed error.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Submission inputs were rejected
    #[error("{0}")]
    Validation(String),

    /// Infrastructure identifiers could not be resolved
    #[error(
        "Workflow configuration not properly set (missing {}). Please check CloudFormation stack outputs.",
        .missing.join(", ")
    )]
    Configuration {
        /// Names of the missing fields
        missing: Vec<&'static str>,
    },

    /// Infrastructure stack lookup failed
    #[error("Stack lookup failed: {0}")]
    StackLookup(String),

    /// Caller identity lookup failed
    #[error("Identity lookup failed: {0}")]
    Identity(String),

    /// The execution service rejected or failed the submission
    #[error("Submission failed: {0}")]
    Submission(String),

    /// The run status query failed
    #[error("Status query failed: {0}")]
    Monitor(String),

    /// An object-store call failed
    #[error("{0}")]
    Storage(String),

    /// An output location could not be parsed
    #[error("Invalid output location: {0}")]
    InvalidLocation(String),
}

impl ClientError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this error was raised before any service call
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Configuration { .. })
    }
}
