//! Request authentication: session cookie first, Firebase ID token second.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_cookies::Cookies;
use tracing::{debug, warn};

use jobfinder_auth::SessionStore;
use jobfinder_models::{AccountId, Persistence, SessionId};

use crate::cookies;
use crate::error::ApiError;
use crate::state::AppState;

/// Google JWKS URL for Firebase Auth.
const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Firebase token issuer prefix.
const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Decoded Firebase ID token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseClaims {
    /// User ID
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub iss: String,
    /// Firebase project ID
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// How the caller proved who they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    SessionCookie,
    BearerToken,
}

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: AccountId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub method: AuthMethod,
    /// Set for cookie sessions only
    pub session_id: Option<SessionId>,
    pub persistence: Option<Persistence>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<FirebaseClaims> for AuthUser {
    fn from(claims: FirebaseClaims) -> Self {
        Self {
            uid: AccountId::new(claims.sub),
            email: claims.email,
            display_name: claims.name,
            method: AuthMethod::BearerToken,
            session_id: None,
            persistence: None,
            expires_at: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JwkKey>,
}

#[derive(Debug, Clone, Deserialize)]
struct JwkKey {
    kid: String,
    n: String,
    e: String,
}

/// Google signing keys for Firebase ID tokens, refreshed hourly.
pub struct JwksCache {
    http: Client,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_refresh: RwLock<Option<Instant>>,
    project_id: String,
}

impl JwksCache {
    /// Keys are fetched lazily on first use.
    pub fn new(project_id: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            keys: RwLock::new(HashMap::new()),
            last_refresh: RwLock::new(None),
            project_id: project_id.into(),
        })
    }

    async fn refresh_keys(&self) -> anyhow::Result<()> {
        debug!("Refreshing JWKS keys");

        let jwks: JwksResponse = self
            .http
            .get(GOOGLE_JWKS_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)?;
            keys.insert(jwk.kid, key);
        }

        let key_count = keys.len();
        *self.keys.write().await = keys;
        *self.last_refresh.write().await = Some(Instant::now());

        debug!("Refreshed {} JWKS keys", key_count);
        Ok(())
    }

    async fn get_key(&self, kid: &str) -> Option<DecodingKey> {
        let needs_refresh = self
            .last_refresh
            .read()
            .await
            .map_or(true, |last| last.elapsed() > JWKS_CACHE_TTL);

        if needs_refresh {
            if let Err(e) = self.refresh_keys().await {
                warn!("Failed to refresh JWKS keys: {}", e);
            }
        }

        self.keys.read().await.get(kid).cloned()
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[format!("{}{}", FIREBASE_ISSUER_PREFIX, self.project_id)]);
        validation.set_audience(&[&self.project_id]);
        validation
    }

    /// Verify a Firebase ID token.
    pub async fn verify_token(&self, token: &str) -> Result<FirebaseClaims, ApiError> {
        let header = decode_header(token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token header: {}", e)))?;

        let kid = header
            .kid
            .ok_or_else(|| ApiError::unauthorized("Token missing key ID"))?;

        let key = self
            .get_key(&kid)
            .await
            .ok_or_else(|| ApiError::unauthorized("Unknown key ID"))?;

        let token_data = decode::<FirebaseClaims>(token, &key, &self.validation())
            .map_err(|e| ApiError::unauthorized(format!("Token validation failed: {}", e)))?;

        Ok(token_data.claims)
    }
}

async fn from_session_cookie(
    parts: &mut Parts,
    state: &AppState,
) -> Result<Option<AuthUser>, ApiError> {
    let cookies = Cookies::from_request_parts(parts, state)
        .await
        .map_err(|(_, msg)| ApiError::internal(msg))?;

    let Some(session_id) = cookies::session_id(&cookies) else {
        return Ok(None);
    };

    let Some(session) = state.sessions.current(&session_id).await? else {
        // Stale cookie from an expired or ended session
        cookies::clear_session(&cookies);
        return Ok(None);
    };

    Ok(Some(AuthUser {
        uid: session.uid,
        email: session.email,
        display_name: session.display_name,
        method: AuthMethod::SessionCookie,
        session_id: Some(session_id),
        persistence: Some(session.persistence),
        expires_at: Some(session.expires_at),
    }))
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = from_session_cookie(parts, state).await? {
            return Ok(user);
        }

        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::unauthorized("Not signed in"))?;

        let jwks = state
            .jwks
            .as_ref()
            .ok_or_else(|| ApiError::unauthorized("Bearer tokens are not accepted"))?;

        let claims = jwks.verify_token(bearer.token()).await?;
        Ok(AuthUser::from(claims))
    }
}
