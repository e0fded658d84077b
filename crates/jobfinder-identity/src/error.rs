//! Identity Toolkit error types.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider understood the request and refused it.
    #[error("Identity provider rejected request: {0}")]
    Rejected(AuthErrorCode),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected response ({0}): {1}")]
    UnexpectedResponse(u16, String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IdentityError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Provider error code, when the provider returned one.
    pub fn code(&self) -> Option<&AuthErrorCode> {
        match self {
            IdentityError::Rejected(code) => Some(code),
            _ => None,
        }
    }

    /// Decode an Identity Toolkit error body
    /// (`{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`).
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Rejected(AuthErrorCode::parse(&envelope.error.message)),
            Err(_) => Self::UnexpectedResponse(status, body.to_string()),
        }
    }

    /// Label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            IdentityError::Rejected(_) => "rejected",
            IdentityError::Config(_) => "config",
            IdentityError::UnexpectedResponse(..) => "unexpected",
            IdentityError::Network(_) => "network",
            IdentityError::Json(_) => "decode",
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Authentication failure reasons, named after the web SDK's `auth/*` codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    UserDisabled,
    TooManyRequests,
    OperationNotAllowed,
    PopupClosedByUser,
    CancelledPopupRequest,
    AccountExistsWithDifferentCredential,
    /// Anything else the provider sent, verbatim
    Other(String),
}

impl AuthErrorCode {
    /// Parse a provider message such as `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub fn parse(message: &str) -> Self {
        let code = message.split(':').next().unwrap_or_default().trim();
        match code {
            "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "INVALID_EMAIL" | "MISSING_EMAIL" => Self::InvalidEmail,
            "EMAIL_NOT_FOUND" => Self::UserNotFound,
            "INVALID_PASSWORD" | "MISSING_PASSWORD" => Self::WrongPassword,
            "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => Self::InvalidCredential,
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyRequests,
            "OPERATION_NOT_ALLOWED" => Self::OperationNotAllowed,
            "USER_CANCELLED" => Self::CancelledPopupRequest,
            "FEDERATED_USER_ID_ALREADY_LINKED" => Self::AccountExistsWithDifferentCredential,
            other => Self::Other(other.to_string()),
        }
    }

    /// Web SDK code without the `auth/` prefix.
    pub fn as_str(&self) -> &str {
        match self {
            Self::EmailAlreadyInUse => "email-already-in-use",
            Self::WeakPassword => "weak-password",
            Self::InvalidEmail => "invalid-email",
            Self::UserNotFound => "user-not-found",
            Self::WrongPassword => "wrong-password",
            Self::InvalidCredential => "invalid-credential",
            Self::UserDisabled => "user-disabled",
            Self::TooManyRequests => "too-many-requests",
            Self::OperationNotAllowed => "operation-not-allowed",
            Self::PopupClosedByUser => "popup-closed-by-user",
            Self::CancelledPopupRequest => "cancelled-popup-request",
            Self::AccountExistsWithDifferentCredential => "account-exists-with-different-credential",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "auth/{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_detail_suffix() {
        assert_eq!(
            AuthErrorCode::parse("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthErrorCode::WeakPassword
        );
        assert_eq!(
            AuthErrorCode::parse("TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled"),
            AuthErrorCode::TooManyRequests
        );
    }

    #[test]
    fn test_parse_unknown_code_is_kept() {
        assert_eq!(
            AuthErrorCode::parse("QUOTA_EXCEEDED"),
            AuthErrorCode::Other("QUOTA_EXCEEDED".into())
        );
        assert_eq!(AuthErrorCode::parse("QUOTA_EXCEEDED").as_str(), "QUOTA_EXCEEDED");
    }

    #[test]
    fn test_display_uses_auth_prefix() {
        assert_eq!(AuthErrorCode::EmailAlreadyInUse.to_string(), "auth/email-already-in-use");
    }

    #[test]
    fn test_from_response_body() {
        let err = IdentityError::from_response(
            400,
            r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#,
        );
        assert_eq!(err.code(), Some(&AuthErrorCode::EmailAlreadyInUse));

        let err = IdentityError::from_response(502, "<html>bad gateway</html>");
        assert!(matches!(err, IdentityError::UnexpectedResponse(502, _)));
        assert!(err.code().is_none());
    }
}
