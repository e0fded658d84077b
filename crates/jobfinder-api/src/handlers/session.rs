//! Current session.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use jobfinder_models::{AccountId, Persistence, UserProfile};

use crate::auth::{AuthMethod, AuthUser};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub uid: AccountId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub auth_method: AuthMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence: Option<Persistence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub profile: Option<UserProfile>,
    pub redirect: Option<String>,
}

/// Who is signed in, with their profile document.
pub async fn current_session(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<SessionResponse>> {
    let profile = state.gateway.profiles().get(&user.uid).await?;

    Ok(Json(SessionResponse {
        redirect: profile
            .as_ref()
            .map(|p| p.user_type.landing_path().to_string()),
        uid: user.uid,
        email: user.email,
        display_name: user.display_name,
        auth_method: user.method,
        persistence: user.persistence,
        expires_at: user.expires_at,
        profile,
    }))
}
