//! Register, login, social sign-in and logout.
//!
//! Every successful call sets the `jf_session` cookie and answers with the
//! page the browser should go to next; the API never redirects itself.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use tracing::{info, warn};
use validator::Validate;

use jobfinder_auth::messages::{self, AuthOperation};
use jobfinder_auth::{
    ActiveSession, LoginRequest, RegisterRequest, RegistrationOutcome, SignedIn,
    SocialSignInRequest,
};
use jobfinder_models::{
    AccountId, Persistence, Role, SocialCredential, SocialProvider, SocialProviderParseError,
    UserProfile,
};

use crate::cookies;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match!";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    #[validate(length(min = 1, max = 254, message = "email is required"))]
    pub email: String,
    #[validate(length(max = 128, message = "password is too long"))]
    pub password: String,
    #[serde(default)]
    pub confirm_password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub display_name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[validate(length(min = 1, max = 254, message = "email is required"))]
    pub email: String,
    #[validate(length(max = 128, message = "password is too long"))]
    pub password: String,
    #[serde(default)]
    pub remember: bool,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialBody {
    #[serde(default)]
    pub role: Option<Role>,
    /// Defaults to a durable session
    #[serde(default)]
    pub remember: Option<bool>,
    #[serde(default, alias = "id_token")]
    pub id_token: Option<String>,
    #[serde(default, alias = "access_token")]
    pub access_token: Option<String>,
    #[serde(default, alias = "request_uri")]
    pub request_uri: Option<String>,
}

impl SocialBody {
    fn credential(&self) -> SocialCredential {
        SocialCredential {
            id_token: self.id_token.clone(),
            access_token: self.access_token.clone(),
            request_uri: self.request_uri.clone(),
        }
    }
}

/// Body of every successful sign-in or registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub uid: AccountId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub persistence: Persistence,
    pub profile: Option<UserProfile>,
    /// Page to navigate to, when the role is known
    pub redirect: Option<String>,
    /// Degraded-success message (registration only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl AuthResponse {
    fn new(session: &ActiveSession, profile: Option<UserProfile>) -> Self {
        Self {
            uid: session.uid.clone(),
            email: session.email.clone(),
            display_name: session.display_name.clone(),
            persistence: session.persistence,
            redirect: profile
                .as_ref()
                .map(|p| p.user_type.landing_path().to_string()),
            profile,
            warning: None,
        }
    }
}

/// Reject a submission that arrives without a role.
fn require_selected_role(role: Option<Role>, message: &str) -> ApiResult<Role> {
    role.ok_or_else(|| ApiError::auth(StatusCode::BAD_REQUEST, "role-required", message))
}

/// Create an account with the selected role.
///
/// A profile write failure still answers 201 with the session cookie set,
/// plus a `warning`.
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<RegisterBody>,
) -> ApiResult<impl IntoResponse> {
    body.validate()?;

    if body
        .confirm_password
        .as_deref()
        .is_some_and(|confirm| confirm != body.password)
    {
        return Err(ApiError::auth(
            StatusCode::BAD_REQUEST,
            "password-mismatch",
            PASSWORDS_DO_NOT_MATCH,
        ));
    }
    let role = require_selected_role(body.role, messages::SELECT_ACCOUNT_TYPE)?;

    let outcome = state
        .gateway
        .register(RegisterRequest {
            email: body.email.trim().to_string(),
            password: body.password,
            role,
            display_name: body.display_name.trim().to_string(),
        })
        .await
        .map_err(|e| ApiError::from_gateway(e, AuthOperation::Register))?;

    replace_session(&state, &cookies, outcome.session()).await;

    let mut response = AuthResponse::new(outcome.session(), outcome.profile().cloned());
    if let RegistrationOutcome::AccountOnly { error, .. } = &outcome {
        warn!(uid = %outcome.session().uid, error = %error, "Registered without profile");
        response.warning = outcome.warning().map(str::to_string);
        // The role is still known even though it was not stored
        response.redirect = Some(role.landing_path().to_string());
    }

    Ok((StatusCode::CREATED, Json(response)))
}

/// Email/password sign-in followed by the role check.
///
/// On a role mismatch the session cookie is still set; the 403 tells the page
/// not to navigate.
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<LoginBody>,
) -> ApiResult<Json<AuthResponse>> {
    body.validate()?;
    let role = require_selected_role(body.role, messages::SELECT_ACCOUNT_TYPE)?;

    let signed_in = state
        .gateway
        .login(LoginRequest {
            email: body.email.trim().to_string(),
            password: body.password,
            remember: body.remember,
        })
        .await
        .map_err(|e| ApiError::from_gateway(e, AuthOperation::Login))?;

    replace_session(&state, &cookies, &signed_in.session).await;

    if let Err(rejection) = signed_in.require_role(role) {
        info!(uid = %signed_in.session.uid, selected = %role, reason = ?rejection, "Login rejected");
        return Err(rejection.into());
    }

    Ok(Json(signed_in_response(signed_in)))
}

/// OAuth sign-in with the credential the provider popup returned.
pub async fn social_sign_in(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(provider): Path<String>,
    body: Option<Json<SocialBody>>,
) -> ApiResult<Json<AuthResponse>> {
    let provider: SocialProvider = provider
        .parse()
        .map_err(|e: SocialProviderParseError| ApiError::not_found(e.to_string()))?;
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let role = require_selected_role(body.role, messages::SELECT_ACCOUNT_TYPE_FIRST)?;

    let signed_in = state
        .gateway
        .social_sign_in(SocialSignInRequest {
            provider,
            role,
            remember: body.remember.unwrap_or(true),
            credential: body.credential(),
        })
        .await
        .map_err(|e| ApiError::from_gateway(e, AuthOperation::Social(provider)))?;

    replace_session(&state, &cookies, &signed_in.session).await;

    Ok(Json(signed_in_response(signed_in)))
}

/// End the cookie's session. Always 204, signed in or not.
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> ApiResult<StatusCode> {
    if let Some(session_id) = cookies::session_id(&cookies) {
        state.gateway.logout(&session_id).await?;
    }
    cookies::clear_session(&cookies);
    Ok(StatusCode::NO_CONTENT)
}

/// Point the cookie at a freshly established session, ending the one it
/// pointed at before. A browser has one signed-in account at a time.
async fn replace_session(state: &AppState, cookies: &Cookies, session: &ActiveSession) {
    if let Some(previous) = cookies::session_id(cookies) {
        if previous != session.session_id {
            if let Err(e) = state.gateway.logout(&previous).await {
                warn!(error = %e, "Failed to end previous session");
            }
        }
    }
    cookies::set_session(cookies, session, state.config.session_cookie_secure);
}

fn signed_in_response(signed_in: SignedIn) -> AuthResponse {
    AuthResponse::new(&signed_in.session, signed_in.profile)
}
