//! Identity Toolkit REST client.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};

use jobfinder_models::{SocialCredential, SocialProvider};

use crate::error::{IdentityError, IdentityResult};
use crate::metrics::record_request;
use crate::types::{
    IdpRequest, IdpSignInResponse, PasswordRequest, SignInResponse, UpdateProfileRequest,
};

/// Used as `requestUri` when the browser did not report one.
const DEFAULT_REQUEST_URI: &str = "http://localhost";

/// Identity client configuration.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Firebase web API key
    pub api_key: String,
    /// `host:port` of the Auth emulator
    pub emulator_host: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl IdentityConfig {
    /// Create config from environment variables.
    ///
    /// `FIREBASE_API_KEY` is required unless the Auth emulator is configured,
    /// which accepts any key.
    pub fn from_env() -> IdentityResult<Self> {
        let emulator_host = std::env::var("FIREBASE_AUTH_EMULATOR_HOST")
            .ok()
            .filter(|h| !h.is_empty());

        let api_key = match std::env::var("FIREBASE_API_KEY").ok().filter(|k| !k.is_empty()) {
            Some(key) => key,
            None if emulator_host.is_some() => "emulator-api-key".to_string(),
            None => {
                return Err(IdentityError::config(
                    "FIREBASE_API_KEY must be set to use Firebase Authentication",
                ))
            }
        };

        let timeout_secs: u64 = std::env::var("IDENTITY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(15);
        let connect_timeout_secs: u64 = std::env::var("IDENTITY_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            api_key,
            emulator_host,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }

    fn base_url(&self) -> String {
        match &self.emulator_host {
            Some(host) => format!("http://{}/identitytoolkit.googleapis.com/v1", host),
            None => "https://identitytoolkit.googleapis.com/v1".to_string(),
        }
    }
}

/// Identity Toolkit REST client.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl IdentityToolkitClient {
    pub fn new(config: IdentityConfig) -> IdentityResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("jobfinder-identity/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if let Some(host) = &config.emulator_host {
            debug!(host = %host, "Using Firebase Auth emulator");
        }

        Ok(Self {
            http,
            base_url: config.base_url(),
            api_key: config.api_key,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> IdentityResult<Self> {
        Self::new(IdentityConfig::from_env()?)
    }

    /// Create an email/password account.
    pub async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<SignInResponse> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.post("signUp", &body).await
    }

    /// Authenticate with email and password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> IdentityResult<SignInResponse> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.post("signInWithPassword", &body).await
    }

    /// Exchange an OAuth credential from the browser for a Firebase account.
    pub async fn sign_in_with_idp(
        &self,
        provider: SocialProvider,
        credential: &SocialCredential,
    ) -> IdentityResult<IdpSignInResponse> {
        let body = IdpRequest {
            post_body: idp_post_body(provider, credential),
            request_uri: credential.request_uri.as_deref().unwrap_or(DEFAULT_REQUEST_URI),
            return_secure_token: true,
            return_idp_credential: true,
        };
        self.post("signInWithIdp", &body).await
    }

    /// Set the display name of the account behind `id_token`.
    pub async fn update_display_name(&self, id_token: &str, display_name: &str) -> IdentityResult<()> {
        let body = UpdateProfileRequest {
            id_token,
            display_name,
            return_secure_token: false,
        };
        self.post::<_, serde_json::Value>("update", &body).await?;
        Ok(())
    }

    async fn post<B, T>(&self, method: &'static str, body: &B) -> IdentityResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/accounts:{}", self.base_url, method);
        let span = info_span!("identity_request", operation = method);

        let start = Instant::now();
        let result = async {
            let response = self
                .http
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(body)
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                Ok(response.json::<T>().await?)
            } else {
                let text = response.text().await.unwrap_or_default();
                Err(IdentityError::from_response(status.as_u16(), &text))
            }
        }
        .instrument(span)
        .await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        };
        record_request(method, outcome, start.elapsed().as_millis() as f64);

        result
    }
}

/// Build the form-encoded `postBody` for `accounts:signInWithIdp`.
fn idp_post_body(provider: SocialProvider, credential: &SocialCredential) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    if let Some(token) = credential.id_token.as_deref().filter(|t| !t.is_empty()) {
        form.append_pair("id_token", token);
    }
    if let Some(token) = credential.access_token.as_deref().filter(|t| !t.is_empty()) {
        form.append_pair("access_token", token);
    }
    form.append_pair("providerId", provider.provider_id());
    form.finish()
}
