//! Holding: top-level organizational container owning companies.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::validation::{bound_opt, require, ValidationError};

/// A holding row. Name is globally unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a holding.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHolding {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewHolding {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name, 255)?;
        bound_opt("description", self.description.as_deref(), 500)
    }
}

/// Partial update; absent fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HoldingUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl HoldingUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name, 255)?;
        }
        bound_opt("description", self.description.as_deref(), 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_holding_requires_name() {
        let new = NewHolding {
            name: String::new(),
            description: None,
        };
        assert!(new.validate().is_err());
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        assert!(HoldingUpdate::default().validate().is_ok());
    }
}
