//! Application state.

use std::sync::Arc;

use tracing::info;

use jobfinder_auth::{
    AuthGateway, FirestoreProfileStore, IdentityProvider, InMemoryIdentity, InMemoryProfileStore,
    InMemorySessionStore, ProfileStore, SessionTtl,
};
use jobfinder_firestore::{FirestoreClient, FirestoreConfig};
use jobfinder_identity::IdentityToolkitClient;

use crate::auth::JwksCache;
use crate::config::{ApiConfig, AuthBackend};
use crate::services::JobCatalog;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub gateway: AuthGateway,
    pub sessions: Arc<InMemorySessionStore>,
    pub catalog: Arc<JobCatalog>,
    /// Present when Firebase ID tokens are accepted as bearer credentials
    pub jwks: Option<Arc<JwksCache>>,
}

impl AppState {
    /// Create application state for the configured backend.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        match config.auth_backend {
            AuthBackend::Firebase => {
                let firestore_config = FirestoreConfig::from_env()?;
                let project_id = firestore_config.project_id.clone();
                let firestore = FirestoreClient::new(firestore_config).await?;
                let identity = IdentityToolkitClient::from_env()?;
                let jwks = JwksCache::new(project_id)?;

                info!("Using Firebase auth backend");
                let mut state = Self::with_backends(
                    config,
                    Arc::new(identity),
                    Arc::new(FirestoreProfileStore::new(firestore)),
                );
                state.jwks = Some(Arc::new(jwks));
                Ok(state)
            }
            AuthBackend::Memory => {
                info!("Using in-memory auth backend; accounts are lost on restart");
                Ok(Self::in_memory(config))
            }
        }
    }

    /// State over the given identity provider and profile store, with a
    /// fresh session store and the sample job catalog.
    pub fn with_backends(
        config: ApiConfig,
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        let sessions = Arc::new(InMemorySessionStore::new(SessionTtl::default()));
        let gateway = AuthGateway::new(identity, profiles, sessions.clone());

        Self {
            config,
            gateway,
            sessions,
            catalog: Arc::new(JobCatalog::sample()),
            jwks: None,
        }
    }

    /// Process-local backends only.
    pub fn in_memory(config: ApiConfig) -> Self {
        Self::with_backends(
            config,
            Arc::new(InMemoryIdentity::new()),
            Arc::new(InMemoryProfileStore::new()),
        )
    }
}
