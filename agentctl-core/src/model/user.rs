//! User: system account optionally linked to agents.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::validation::{require, ValidationError};

/// A user row. Username and email are each globally unique.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("username", &self.username, 255)?;
        require("email", &self.email, 255)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(username) = &self.username {
            require("username", username, 255)?;
        }
        if let Some(email) = &self.email {
            require("email", email, 255)?;
        }
        Ok(())
    }
}
