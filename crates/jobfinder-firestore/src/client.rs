//! Firestore REST API client.
//!
//! Covers the document operations the profile store needs:
//! - Single document reads
//! - Full writes (`set`) and field-mask merges, both as upserts
//! - Service account tokens via gcp_auth, or the local emulator
//! - Tracing spans and request metrics around every call

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, info_span, Instrument};

use crate::error::{FirestoreError, FirestoreResult};
use crate::metrics::record_request;
use crate::token_cache::TokenCache;
use crate::types::{Document, Value};

/// Firestore client configuration.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// GCP project ID
    pub project_id: String,
    /// Database ID (usually "(default)")
    pub database_id: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// `host:port` of a Firestore emulator; skips service account auth when set
    pub emulator_host: Option<String>,
}

impl FirestoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> FirestoreResult<Self> {
        let project_id = std::env::var("GCP_PROJECT_ID")
            .or_else(|_| std::env::var("FIREBASE_PROJECT_ID"))
            .map_err(|_| {
                FirestoreError::auth_error(
                    "GCP_PROJECT_ID or FIREBASE_PROJECT_ID must be set to access Firestore",
                )
            })?;

        if project_id.is_empty() {
            return Err(FirestoreError::auth_error(
                "GCP_PROJECT_ID or FIREBASE_PROJECT_ID cannot be empty",
            ));
        }

        let connect_timeout_secs: u64 = std::env::var("FIRESTORE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            project_id,
            database_id: std::env::var("FIRESTORE_DATABASE_ID")
                .unwrap_or_else(|_| "(default)".to_string()),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            emulator_host: std::env::var("FIRESTORE_EMULATOR_HOST")
                .ok()
                .filter(|h| !h.is_empty()),
        })
    }

    fn base_url(&self) -> String {
        match &self.emulator_host {
            Some(host) => format!(
                "http://{}/v1/projects/{}/databases/{}/documents",
                host, self.project_id, self.database_id
            ),
            None => format!(
                "https://firestore.googleapis.com/v1/projects/{}/databases/{}/documents",
                self.project_id, self.database_id
            ),
        }
    }
}

#[derive(Clone)]
enum Auth {
    ServiceAccount(Arc<TokenCache>),
    /// The emulator accepts this fixed token with admin rights
    Emulator,
}

/// Firestore REST API client.
#[derive(Clone)]
pub struct FirestoreClient {
    http: Client,
    base_url: String,
    auth: Auth,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    pub async fn new(config: FirestoreConfig) -> FirestoreResult<Self> {
        let auth = match config.emulator_host {
            Some(ref host) => {
                debug!(host = %host, "Using Firestore emulator");
                Auth::Emulator
            }
            None => Auth::ServiceAccount(Arc::new(TokenCache::new(Self::create_auth_provider()?))),
        };

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("jobfinder-firestore/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FirestoreError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            auth,
        })
    }

    fn create_auth_provider() -> FirestoreResult<Arc<dyn TokenProvider>> {
        let service_account = CustomServiceAccount::from_env().map_err(|e| {
            FirestoreError::auth_error(format!("Failed to load service account: {}", e))
        })?;

        match service_account {
            Some(sa) => Ok(Arc::new(sa)),
            None => Err(FirestoreError::auth_error(
                "GOOGLE_APPLICATION_CREDENTIALS not set. \
                 Set it to the path of your service account JSON file.",
            )),
        }
    }

    /// Create from environment variables.
    pub async fn from_env() -> FirestoreResult<Self> {
        Self::new(FirestoreConfig::from_env()?).await
    }

    fn document_path(&self, collection: &str, doc_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            collection,
            urlencoding::encode(doc_id)
        )
    }

    fn is_access_token_expired(body: &str) -> bool {
        body.contains("ACCESS_TOKEN_EXPIRED") || body.contains("\"UNAUTHENTICATED\"")
    }

    async fn authorize(&self, request: RequestBuilder) -> FirestoreResult<RequestBuilder> {
        match &self.auth {
            Auth::ServiceAccount(cache) => Ok(request.bearer_auth(cache.get_token().await?)),
            Auth::Emulator => Ok(request.bearer_auth("owner")),
        }
    }

    /// Send an authorized request. An expired token is replaced once and the
    /// request repeated; nothing else is retried.
    async fn send<F>(&self, build: F) -> FirestoreResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let response = self.authorize(build()).await?.send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Auth::ServiceAccount(cache) = &self.auth else {
            return Ok(response);
        };

        let body = response.text().await.unwrap_or_default();
        if !Self::is_access_token_expired(&body) {
            return Err(FirestoreError::from_http_status(401, body));
        }

        debug!("Firestore access token expired, refreshing");
        cache.invalidate().await;
        Ok(self.authorize(build()).await?.send().await?)
    }

    /// Get a document. Returns `None` when it does not exist.
    pub async fn get_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> FirestoreResult<Option<Document>> {
        let url = self.document_path(collection, doc_id);

        self.execute_request("get_document", collection, doc_id, async {
            let response = self.send(|| self.http.get(&url)).await?;

            match response.status() {
                StatusCode::OK => Ok(Some(response.json().await?)),
                StatusCode::NOT_FOUND => Ok(None),
                status => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Write a document, replacing all existing fields. Creates it if missing.
    pub async fn set_document(
        &self,
        collection: &str,
        doc_id: &str,
        fields: HashMap<String, Value>,
    ) -> FirestoreResult<Document> {
        let url = self.document_path(collection, doc_id);
        self.patch_document("set_document", collection, doc_id, url, fields)
            .await
    }

    /// Write only the given fields, leaving the others untouched. Creates the
    /// document if missing.
    pub async fn merge_document(
        &self,
        collection: &str,
        doc_id: &str,
        fields: HashMap<String, Value>,
    ) -> FirestoreResult<Document> {
        let mut mask: Vec<&String> = fields.keys().collect();
        mask.sort();
        let params: Vec<String> = mask
            .iter()
            .map(|f| format!("updateMask.fieldPaths={}", urlencoding::encode(f)))
            .collect();

        let url = format!(
            "{}?{}",
            self.document_path(collection, doc_id),
            params.join("&")
        );
        self.patch_document("merge_document", collection, doc_id, url, fields)
            .await
    }

    async fn patch_document(
        &self,
        operation: &str,
        collection: &str,
        doc_id: &str,
        url: String,
        fields: HashMap<String, Value>,
    ) -> FirestoreResult<Document> {
        let body = Document::new(fields);

        self.execute_request(operation, collection, doc_id, async {
            let response = self.send(|| self.http.patch(&url).json(&body)).await?;

            match response.status() {
                StatusCode::OK => Ok(response.json().await?),
                status => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    async fn execute_request<T, F>(
        &self,
        operation: &str,
        collection: &str,
        doc_id: &str,
        fut: F,
    ) -> FirestoreResult<T>
    where
        F: std::future::Future<Output = FirestoreResult<T>>,
    {
        let span = info_span!(
            "firestore_request",
            operation = %operation,
            collection = %collection,
            doc_id = %doc_id
        );

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn handle_error_response(status: StatusCode, url: &str, response: Response) -> FirestoreError {
        let body = response.text().await.unwrap_or_default();
        FirestoreError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env_validates_project_id() {
        std::env::remove_var("GCP_PROJECT_ID");
        std::env::remove_var("FIREBASE_PROJECT_ID");
        assert!(FirestoreConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_config_default_values() {
        std::env::set_var("GCP_PROJECT_ID", "test-project");
        std::env::remove_var("FIRESTORE_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("FIRESTORE_DATABASE_ID");
        std::env::remove_var("FIRESTORE_EMULATOR_HOST");

        let config = FirestoreConfig::from_env().unwrap();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.database_id, "(default)");
        assert!(config.emulator_host.is_none());
        assert_eq!(
            config.base_url(),
            "https://firestore.googleapis.com/v1/projects/test-project/databases/(default)/documents"
        );

        std::env::remove_var("GCP_PROJECT_ID");
    }

    #[test]
    #[serial]
    fn test_config_emulator_host() {
        std::env::set_var("FIREBASE_PROJECT_ID", "demo-jobs");
        std::env::remove_var("GCP_PROJECT_ID");
        std::env::set_var("FIRESTORE_EMULATOR_HOST", "localhost:8080");

        let config = FirestoreConfig::from_env().unwrap();
        assert_eq!(
            config.base_url(),
            "http://localhost:8080/v1/projects/demo-jobs/databases/(default)/documents"
        );

        std::env::remove_var("FIREBASE_PROJECT_ID");
        std::env::remove_var("FIRESTORE_EMULATOR_HOST");
    }

    #[test]
    fn test_access_token_expired_detection() {
        assert!(FirestoreClient::is_access_token_expired(
            r#"{"error":{"status":"UNAUTHENTICATED"}}"#
        ));
        assert!(!FirestoreClient::is_access_token_expired(
            r#"{"error":{"status":"PERMISSION_DENIED"}}"#
        ));
    }
}
