//! User profile documents.

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::role::Role;

/// Identifier assigned to an account by the identity provider (Firebase `localId`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Application-level record stored at `users/{uid}`.
///
/// `user_type` is written once, when the document is created. Later sign-ins
/// only ever merge `last_login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Social accounts may come back without an email
    pub email: Option<String>,
    pub display_name: String,
    pub user_type: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    /// Firebase provider id (`google.com`, ...) for social sign-ups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<String>,
}

impl UserProfile {
    /// Profile written right after an email/password registration.
    pub fn for_registration(email: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            email: Some(email.into()),
            display_name: display_name.into(),
            user_type: role,
            created_at: Utc::now(),
            last_login: None,
            auth_provider: None,
        }
    }

    /// Profile written on the first social sign-in of an account.
    ///
    /// Falls back to "{role} User" when the provider returned no display name.
    pub fn for_social_sign_up(
        email: Option<String>,
        display_name: Option<String>,
        role: Role,
        provider_id: impl Into<String>,
    ) -> Self {
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("{} User", role));

        Self {
            email,
            display_name,
            user_type: role,
            created_at: Utc::now(),
            last_login: None,
            auth_provider: Some(provider_id.into()),
        }
    }

    /// Whether the stored role matches the one picked on the login form.
    pub fn matches_role(&self, role: Role) -> bool {
        self.user_type == role
    }
}

/// Format a timestamp the way the web client stored it (`toISOString()`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
