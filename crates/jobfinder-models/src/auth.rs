//! Social sign-in providers and session persistence.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// OAuth providers offered on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    Facebook,
    #[serde(alias = "linkedIn")]
    Linkedin,
}

impl SocialProvider {
    /// Provider id as understood by Firebase Authentication.
    pub fn provider_id(&self) -> &'static str {
        match self {
            SocialProvider::Google => "google.com",
            SocialProvider::Facebook => "facebook.com",
            SocialProvider::Linkedin => "linkedin.com",
        }
    }

    /// Short lowercase name used in routes and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialProvider::Google => "google",
            SocialProvider::Facebook => "facebook",
            SocialProvider::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SocialProvider {
    type Err = SocialProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "google.com" => Ok(SocialProvider::Google),
            "facebook" | "facebook.com" => Ok(SocialProvider::Facebook),
            "linkedin" | "linkedin.com" => Ok(SocialProvider::Linkedin),
            _ => Err(SocialProviderParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown sign-in provider: {0}")]
pub struct SocialProviderParseError(String);

/// Credential returned by a provider's OAuth popup in the browser.
///
/// At least one of the tokens must be present for a sign-in to proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SocialCredential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Page the popup completed on; Firebase requires it for IdP sign-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_uri: Option<String>,
}

impl SocialCredential {
    /// False when the popup was closed before any token came back.
    pub fn is_present(&self) -> bool {
        let non_empty = |t: &Option<String>| t.as_deref().is_some_and(|t| !t.is_empty());
        non_empty(&self.id_token) || non_empty(&self.access_token)
    }
}

/// Whether a session survives a browser restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Persistence {
    /// Kept until explicit logout or expiry
    #[default]
    Durable,
    /// Dropped when the browser session ends
    SessionScoped,
}

impl Persistence {
    /// Map the "remember me" checkbox onto a persistence mode.
    pub fn from_remember(remember: bool) -> Self {
        if remember {
            Persistence::Durable
        } else {
            Persistence::SessionScoped
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Persistence::Durable => "durable",
            Persistence::SessionScoped => "session_scoped",
        }
    }
}

impl fmt::Display for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque identifier of a signed-in browser session, carried in a cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Mint a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_ids() {
        assert_eq!(SocialProvider::Google.provider_id(), "google.com");
        assert_eq!(SocialProvider::Facebook.provider_id(), "facebook.com");
        assert_eq!(SocialProvider::Linkedin.provider_id(), "linkedin.com");
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("LinkedIn".parse::<SocialProvider>().unwrap(), SocialProvider::Linkedin);
        assert_eq!("google.com".parse::<SocialProvider>().unwrap(), SocialProvider::Google);
        assert!("github".parse::<SocialProvider>().is_err());
    }

    #[test]
    fn test_empty_credential_is_absent() {
        assert!(!SocialCredential::default().is_present());
        let credential = SocialCredential {
            id_token: Some(String::new()),
            ..Default::default()
        };
        assert!(!credential.is_present());
        let credential = SocialCredential {
            access_token: Some("ya29.token".into()),
            ..Default::default()
        };
        assert!(credential.is_present());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_persistence_from_remember() {
        assert_eq!(Persistence::from_remember(true), Persistence::Durable);
        assert_eq!(Persistence::from_remember(false), Persistence::SessionScoped);
    }
}
