//! User-facing messages for authentication outcomes.
//!
//! Every provider code the login and registration pages know about maps to a
//! fixed sentence; anything else collapses to the operation's generic message.

use jobfinder_models::{Role, SocialProvider};

use crate::error::{AuthErrorCode, GatewayError};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const TOO_MANY_REQUESTS: &str = "Too many failed login attempts. Please try again later.";
pub const USER_DISABLED: &str = "This account has been disabled. Please contact support.";
pub const POPUP_CLOSED: &str = "Login popup was closed. Please try again.";
pub const POPUP_CANCELLED: &str = "Login process was cancelled. Please try again.";
pub const ACCOUNT_EXISTS_WITH_DIFFERENT_CREDENTIAL: &str = "An account already exists with the same email but different sign-in credentials. Try signing in a different way.";
pub const EMAIL_IN_USE: &str = "This email is already registered. Please sign in instead.";
pub const WEAK_PASSWORD: &str = "Password should be at least 6 characters.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const OPERATION_NOT_ALLOWED: &str = "This sign-in method is not enabled.";

pub const LOGIN_FAILED_GENERIC: &str = "Failed to login. Please try again.";
pub const REGISTER_FAILED_GENERIC: &str = "Failed to create account. Please try again.";

/// Signed in, but no profile document exists for the account.
pub const PROFILE_MISSING: &str = "Login failed. Please try again.";
pub const PROFILE_NOT_SAVED: &str =
    "Account created but profile data could not be saved. Some features may be limited.";

/// Password login submitted without choosing a role.
pub const SELECT_ACCOUNT_TYPE: &str = "Please select account type";
/// Social button pressed without choosing a role.
pub const SELECT_ACCOUNT_TYPE_FIRST: &str = "Please select an account type first";

/// Which flow a failure came from; picks the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    Register,
    Login,
    Social(SocialProvider),
}

impl AuthOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthOperation::Register => "register",
            AuthOperation::Login => "login",
            AuthOperation::Social(_) => "social",
        }
    }

    fn generic_message(&self) -> String {
        match self {
            AuthOperation::Register => REGISTER_FAILED_GENERIC.to_string(),
            AuthOperation::Login => LOGIN_FAILED_GENERIC.to_string(),
            AuthOperation::Social(provider) => {
                format!("Failed to login with {}. Please try again.", provider)
            }
        }
    }
}

/// Message for a known provider code, `None` for codes the pages never showed.
pub fn auth_code_message(code: &AuthErrorCode) -> Option<&'static str> {
    match code {
        AuthErrorCode::UserNotFound | AuthErrorCode::WrongPassword | AuthErrorCode::InvalidCredential => {
            Some(INVALID_CREDENTIALS)
        }
        AuthErrorCode::TooManyRequests => Some(TOO_MANY_REQUESTS),
        AuthErrorCode::UserDisabled => Some(USER_DISABLED),
        AuthErrorCode::PopupClosedByUser => Some(POPUP_CLOSED),
        AuthErrorCode::CancelledPopupRequest => Some(POPUP_CANCELLED),
        AuthErrorCode::AccountExistsWithDifferentCredential => {
            Some(ACCOUNT_EXISTS_WITH_DIFFERENT_CREDENTIAL)
        }
        AuthErrorCode::EmailAlreadyInUse => Some(EMAIL_IN_USE),
        AuthErrorCode::WeakPassword => Some(WEAK_PASSWORD),
        AuthErrorCode::InvalidEmail => Some(INVALID_EMAIL),
        AuthErrorCode::OperationNotAllowed => Some(OPERATION_NOT_ALLOWED),
        AuthErrorCode::Other(_) => None,
    }
}

/// Sentence shown to the user for a failed operation.
pub fn user_message(err: &GatewayError, operation: AuthOperation) -> String {
    err.auth_code()
        .and_then(auth_code_message)
        .map(str::to_string)
        .unwrap_or_else(|| operation.generic_message())
}

pub fn role_mismatch(registered: Role) -> String {
    format!(
        "This account is registered as a {}. Please select the correct account type.",
        registered
    )
}
