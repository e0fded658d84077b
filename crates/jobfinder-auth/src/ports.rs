//! Ports the gateway depends on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use jobfinder_models::{
    AccountId, Persistence, SessionId, SocialCredential, SocialProvider, UserProfile,
};

use crate::error::GatewayResult;

/// Account as reported by the identity provider after a sign-in or sign-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub uid: AccountId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Provider-issued ID token, needed for follow-up account updates
    pub id_token: Option<String>,
}

/// A signed-in browser session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    #[serde(skip)]
    pub session_id: SessionId,
    pub uid: AccountId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub persistence: Persistence,
    pub established_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Accounts and credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an email/password account. The new account is signed in.
    async fn create_account(&self, email: &str, password: &str) -> GatewayResult<Account>;

    async fn update_display_name(&self, account: &Account, display_name: &str) -> GatewayResult<()>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> GatewayResult<Account>;

    /// Complete an OAuth sign-in with the credential returned by the provider popup.
    async fn sign_in_with_idp(
        &self,
        provider: SocialProvider,
        credential: &SocialCredential,
    ) -> GatewayResult<Account>;
}

/// `users/{uid}` profile documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, uid: &AccountId) -> GatewayResult<Option<UserProfile>>;

    /// Write the whole document, replacing any existing one.
    async fn create(&self, uid: &AccountId, profile: &UserProfile) -> GatewayResult<()>;

    /// Merge `lastLogin`, leaving every other field as stored.
    async fn merge_last_login(&self, uid: &AccountId, at: DateTime<Utc>) -> GatewayResult<()>;

    /// Connectivity probe for readiness checks.
    async fn check(&self) -> GatewayResult<()>;
}

/// Which account is signed in on which browser session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record the persistence mode to apply when `session` signs in.
    async fn set_persistence(&self, session: &SessionId, persistence: Persistence) -> GatewayResult<()>;

    /// Bind a signed-in account to `session`, using the recorded persistence
    /// mode (durable when none was recorded).
    async fn establish(&self, session: &SessionId, account: &Account) -> GatewayResult<ActiveSession>;

    /// The live session, `None` when unknown or expired.
    async fn current(&self, session: &SessionId) -> GatewayResult<Option<ActiveSession>>;

    /// Sign out. Ending an unknown session is not an error.
    async fn end(&self, session: &SessionId) -> GatewayResult<()>;
}
