//! Account roles.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role chosen at sign-up. Fixes which profile form and landing page a user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Company account posting jobs
    Employer,
    /// Job seeker
    #[serde(alias = "jobseeker")]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employer => "employer",
            Role::Employee => "employee",
        }
    }

    /// Page a freshly authenticated user of this role is sent to.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Employer => "/profile",
            Role::Employee => "/employee-profile",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employer" => Ok(Role::Employer),
            "employee" | "jobseeker" => Ok(Role::Employee),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown role: {0}")]
pub struct RoleParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_paths() {
        assert_eq!(Role::Employer.landing_path(), "/profile");
        assert_eq!(Role::Employee.landing_path(), "/employee-profile");
    }

    #[test]
    fn test_parse_accepts_jobseeker_alias() {
        assert_eq!("jobseeker".parse::<Role>().unwrap(), Role::Employee);
        assert_eq!(" Employer ".parse::<Role>().unwrap(), Role::Employer);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Employer).unwrap(), "\"employer\"");
        let role: Role = serde_json::from_str("\"jobseeker\"").unwrap();
        assert_eq!(role, Role::Employee);
    }
}
