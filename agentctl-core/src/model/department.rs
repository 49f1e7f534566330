//! Department: owned by a company, contains agents.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::validation::{bound_opt, require, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub company_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub company_id: i64,
}

impl NewDepartment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name, 255)?;
        bound_opt("description", self.description.as_deref(), 500)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub company_id: Option<i64>,
}

impl DepartmentUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name, 255)?;
        }
        bound_opt("description", self.description.as_deref(), 500)
    }
}
