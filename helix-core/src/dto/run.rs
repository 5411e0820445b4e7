//! Run DTOs

use serde::{Deserialize, Serialize};

use crate::domain::run::RunStatus;

/// Acknowledgement of a run submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRunResponse {
    pub run_id: String,
    pub status: RunStatus,
}
