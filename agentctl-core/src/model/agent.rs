//! Agent: a worker inside a department, optionally linked to a user.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{bound_opt, require, ValidationError};

/// Agent lifecycle status. Stored as text, constrained to this set at
/// both the application and the storage boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl AgentStatus {
    pub const ALL: [AgentStatus; 3] = [Self::Active, Self::Inactive, Self::Suspended];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl FromStr for AgentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            other => Err(ValidationError::InvalidVariant {
                field: "status",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An agent row.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub description: Option<String>,
    pub status: AgentStatus,
    pub user_id: Option<i64>,
    pub department_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub department_id: i64,
}

impl NewAgent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name, 255)?;
        require("role", &self.role, 255)?;
        bound_opt("description", self.description.as_deref(), 500)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub status: Option<AgentStatus>,
    pub user_id: Option<i64>,
    pub department_id: Option<i64>,
}

impl AgentUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name, 255)?;
        }
        if let Some(role) = &self.role {
            require("role", role, 255)?;
        }
        bound_opt("description", self.description.as_deref(), 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in AgentStatus::ALL {
            assert_eq!(status.as_str().parse::<AgentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_rejected() {
        let err = "dormant".parse::<AgentStatus>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { .. }));
    }

    #[test]
    fn wire_form_is_snake_case() {
        let json = serde_json::to_string(&AgentStatus::Suspended).unwrap();
        assert_eq!(json, "\"suspended\"");
    }
}
