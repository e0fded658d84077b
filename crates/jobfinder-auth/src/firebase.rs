//! Port implementations backed by Firebase Authentication and Firestore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use jobfinder_firestore::{FirestoreClient, FirestoreError, ProfileRepository};
use jobfinder_identity::{IdentityError, IdentityToolkitClient, IdpSignInResponse, SignInResponse};
use jobfinder_models::{AccountId, SocialCredential, SocialProvider, UserProfile};

use crate::error::{AuthErrorCode, GatewayError, GatewayResult};
use crate::ports::{Account, IdentityProvider, ProfileStore};

impl From<IdentityError> for GatewayError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Rejected(code) => GatewayError::Auth(code),
            other => GatewayError::provider(other.to_string()),
        }
    }
}

impl From<FirestoreError> for GatewayError {
    fn from(e: FirestoreError) -> Self {
        GatewayError::profile_store(e.to_string())
    }
}

impl From<SignInResponse> for Account {
    fn from(resp: SignInResponse) -> Self {
        Account {
            uid: AccountId::new(resp.local_id),
            email: resp.email,
            display_name: resp.display_name.filter(|n| !n.is_empty()),
            id_token: Some(resp.id_token),
        }
    }
}

fn idp_account(resp: IdpSignInResponse) -> GatewayResult<Account> {
    if resp.need_confirmation {
        return Err(GatewayError::auth(
            AuthErrorCode::AccountExistsWithDifferentCredential,
        ));
    }

    let uid = resp
        .local_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GatewayError::provider("signInWithIdp response without localId"))?;

    Ok(Account {
        uid: AccountId::new(uid),
        email: resp.email,
        display_name: resp.display_name.filter(|n| !n.is_empty()),
        id_token: resp.id_token,
    })
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn create_account(&self, email: &str, password: &str) -> GatewayResult<Account> {
        Ok(self.sign_up(email, password).await?.into())
    }

    async fn update_display_name(&self, account: &Account, display_name: &str) -> GatewayResult<()> {
        let id_token = account
            .id_token
            .as_deref()
            .ok_or_else(|| GatewayError::provider("account has no ID token"))?;
        IdentityToolkitClient::update_display_name(self, id_token, display_name).await?;
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> GatewayResult<Account> {
        Ok(IdentityToolkitClient::sign_in_with_password(self, email, password)
            .await?
            .into())
    }

    async fn sign_in_with_idp(
        &self,
        provider: SocialProvider,
        credential: &SocialCredential,
    ) -> GatewayResult<Account> {
        idp_account(IdentityToolkitClient::sign_in_with_idp(self, provider, credential).await?)
    }
}

/// Document read for readiness probes; a 404 still proves connectivity.
const HEALTH_COLLECTION: &str = "_health";
const HEALTH_DOC: &str = "_check";

/// Firestore-backed profile store.
#[derive(Clone)]
pub struct FirestoreProfileStore {
    client: FirestoreClient,
    repo: ProfileRepository,
}

impl FirestoreProfileStore {
    pub fn new(client: FirestoreClient) -> Self {
        Self {
            repo: ProfileRepository::new(client.clone()),
            client,
        }
    }
}

#[async_trait]
impl ProfileStore for FirestoreProfileStore {
    async fn get(&self, uid: &AccountId) -> GatewayResult<Option<UserProfile>> {
        Ok(self.repo.get(uid).await?)
    }

    async fn create(&self, uid: &AccountId, profile: &UserProfile) -> GatewayResult<()> {
        Ok(self.repo.create(uid, profile).await?)
    }

    async fn merge_last_login(&self, uid: &AccountId, at: DateTime<Utc>) -> GatewayResult<()> {
        Ok(self.repo.merge_last_login(uid, at).await?)
    }

    async fn check(&self) -> GatewayResult<()> {
        self.client
            .get_document(HEALTH_COLLECTION, HEALTH_DOC)
            .await?;
        Ok(())
    }
}
