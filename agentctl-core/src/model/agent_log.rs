//! Agent activity log. Rows are append-only: no updates, no updated_at.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::validation::{require, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub struct AgentLog {
    pub id: i64,
    pub agent_id: i64,
    pub log_message: String,
    pub log_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAgentLog {
    pub log_message: String,
    /// Defaults to the insertion time when absent.
    #[serde(default)]
    pub log_time: Option<DateTime<Utc>>,
}

impl NewAgentLog {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("log_message", &self.log_message, 1000)
    }
}
