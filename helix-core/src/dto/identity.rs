//! Identity DTOs

use serde::{Deserialize, Serialize};

/// Account and region of the credentials in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub account_id: String,
    pub region: String,
}
