//! Gateway error types.

use thiserror::Error;

pub use jobfinder_identity::AuthErrorCode;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by the identity gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The identity provider refused the credentials or the request.
    #[error("Authentication failed: {0}")]
    Auth(AuthErrorCode),

    /// The provider could not be reached or answered with something unusable.
    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Profile store error: {0}")]
    ProfileStore(String),

    #[error("Session store error: {0}")]
    Session(String),
}

impl GatewayError {
    pub fn auth(code: AuthErrorCode) -> Self {
        Self::Auth(code)
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn profile_store(msg: impl Into<String>) -> Self {
        Self::ProfileStore(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Provider error code for authentication failures.
    pub fn auth_code(&self) -> Option<&AuthErrorCode> {
        match self {
            GatewayError::Auth(code) => Some(code),
            _ => None,
        }
    }

    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::Auth(_) => "auth_error",
            GatewayError::Provider(_) => "provider_error",
            GatewayError::ProfileStore(_) => "profile_error",
            GatewayError::Session(_) => "session_error",
        }
    }
}
