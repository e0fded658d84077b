//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use jobfinder_auth::messages::{self, AuthOperation};
use jobfinder_auth::{AuthErrorCode, GatewayError, LoginRejection};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A failed auth flow, already phrased for the user.
    #[error("{message}")]
    Auth {
        status: StatusCode,
        message: String,
        code: String,
    },

    /// Signed in, but the selected role does not match the stored one.
    #[error("{0}")]
    Rejected(LoginRejection),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// A user-facing auth failure outside the provider's own codes.
    pub fn auth(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self::Auth {
            status,
            message: message.into(),
            code: code.to_string(),
        }
    }

    /// Map a failed gateway call onto the message the page shows for it.
    ///
    /// Provider rejections keep their code; everything else collapses to the
    /// operation's generic message and is logged here.
    pub fn from_gateway(err: GatewayError, operation: AuthOperation) -> Self {
        let message = messages::user_message(&err, operation);
        match err.auth_code() {
            Some(code) => ApiError::Auth {
                status: auth_status(code),
                code: match code {
                    AuthErrorCode::Other(_) => "auth-failed".to_string(),
                    known => known.as_str().to_string(),
                },
                message,
            },
            None => {
                error!(operation = operation.as_str(), error = %err, "Auth operation failed");
                ApiError::Auth {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "internal".to_string(),
                    message,
                }
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth { status, .. } => *status,
            ApiError::Rejected(LoginRejection::RoleMismatch { .. }) => StatusCode::FORBIDDEN,
            ApiError::Rejected(LoginRejection::MissingProfile) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> Option<String> {
        match self {
            ApiError::Auth { code, .. } => Some(code.clone()),
            ApiError::Rejected(LoginRejection::RoleMismatch { .. }) => {
                Some("role-mismatch".to_string())
            }
            ApiError::Rejected(LoginRejection::MissingProfile) => {
                Some("profile-not-found".to_string())
            }
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<LoginRejection> for ApiError {
    fn from(rejection: LoginRejection) -> Self {
        ApiError::Rejected(rejection)
    }
}

fn auth_status(code: &AuthErrorCode) -> StatusCode {
    match code {
        AuthErrorCode::EmailAlreadyInUse => StatusCode::CONFLICT,
        AuthErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        AuthErrorCode::WeakPassword | AuthErrorCode::InvalidEmail => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNAUTHORIZED,
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Gateway(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            detail,
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}
