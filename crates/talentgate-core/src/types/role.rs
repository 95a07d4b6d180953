//! Platform roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};

/// The role a signed-in user holds on the recruitment platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Applicant,
    Reviewer,
    Manager,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Applicant => "applicant",
            UserRole::Reviewer => "reviewer",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }

    /// Reviewers, managers and admins can read other people's applications.
    pub fn is_staff(&self) -> bool {
        !matches!(self, UserRole::Applicant)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "applicant" => Ok(UserRole::Applicant),
            "reviewer" => Ok(UserRole::Reviewer),
            "manager" => Ok(UserRole::Manager),
            "admin" => Ok(UserRole::Admin),
            _ => Err(InvalidInputError::Other {
                message: format!("unknown role '{s}'"),
            }
            .into()),
        }
    }
}
