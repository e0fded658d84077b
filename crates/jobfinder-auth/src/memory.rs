//! In-memory identity provider and profile store.
//!
//! Used with `AUTH_BACKEND=memory` for local development without Firebase,
//! and by the HTTP tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use jobfinder_models::{AccountId, SocialCredential, SocialProvider, UserProfile};

use crate::error::{AuthErrorCode, GatewayError, GatewayResult};
use crate::ports::{Account, IdentityProvider, ProfileStore};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct StoredAccount {
    uid: AccountId,
    email: String,
    password: String,
    display_name: Option<String>,
    disabled: bool,
}

impl StoredAccount {
    fn to_account(&self) -> Account {
        Account {
            uid: self.uid.clone(),
            email: Some(self.email.clone()),
            display_name: self.display_name.clone(),
            id_token: Some(format!("memory-token-{}", self.uid)),
        }
    }
}

#[derive(Default)]
struct IdentityState {
    /// Keyed by lowercased email
    by_email: HashMap<String, StoredAccount>,
    /// Keyed by (provider id, token subject)
    federated: HashMap<(String, String), Account>,
}

/// Identity provider that keeps accounts in process memory.
///
/// Social credentials are treated as opaque subjects: the same token always
/// signs into the same account, and a token that looks like an email address
/// becomes the account's email.
#[derive(Default)]
pub struct InMemoryIdentity {
    state: RwLock<IdentityState>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable an account so further sign-ins fail with `user-disabled`.
    pub async fn disable(&self, email: &str) -> bool {
        let mut state = self.state.write().await;
        match state.by_email.get_mut(&email.to_lowercase()) {
            Some(account) => {
                account.disabled = true;
                true
            }
            None => false,
        }
    }

    pub async fn account_count(&self) -> usize {
        let state = self.state.read().await;
        state.by_email.len() + state.federated.len()
    }
}

fn new_uid() -> AccountId {
    AccountId::new(Uuid::new_v4().simple().to_string())
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn create_account(&self, email: &str, password: &str) -> GatewayResult<Account> {
        let key = email.trim().to_lowercase();
        if key.is_empty() || !key.contains('@') {
            return Err(GatewayError::auth(AuthErrorCode::InvalidEmail));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(GatewayError::auth(AuthErrorCode::WeakPassword));
        }

        let mut state = self.state.write().await;
        if state.by_email.contains_key(&key) {
            return Err(GatewayError::auth(AuthErrorCode::EmailAlreadyInUse));
        }

        let stored = StoredAccount {
            uid: new_uid(),
            email: email.trim().to_string(),
            password: password.to_string(),
            display_name: None,
            disabled: false,
        };
        let account = stored.to_account();
        state.by_email.insert(key, stored);
        Ok(account)
    }

    async fn update_display_name(&self, account: &Account, display_name: &str) -> GatewayResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .by_email
            .values_mut()
            .find(|a| a.uid == account.uid)
            .ok_or(GatewayError::auth(AuthErrorCode::UserNotFound))?;
        stored.display_name = Some(display_name.to_string());
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> GatewayResult<Account> {
        let state = self.state.read().await;
        let stored = state
            .by_email
            .get(&email.trim().to_lowercase())
            .filter(|a| a.password == password)
            .ok_or(GatewayError::auth(AuthErrorCode::InvalidCredential))?;

        if stored.disabled {
            return Err(GatewayError::auth(AuthErrorCode::UserDisabled));
        }
        Ok(stored.to_account())
    }

    async fn sign_in_with_idp(
        &self,
        provider: SocialProvider,
        credential: &SocialCredential,
    ) -> GatewayResult<Account> {
        let subject = credential
            .id_token
            .as_deref()
            .or(credential.access_token.as_deref())
            .filter(|t| !t.is_empty())
            .ok_or(GatewayError::auth(AuthErrorCode::InvalidCredential))?
            .to_string();

        let email = subject.contains('@').then(|| subject.clone());
        let mut state = self.state.write().await;

        if let Some(email) = &email {
            if state.by_email.contains_key(&email.to_lowercase()) {
                return Err(GatewayError::auth(
                    AuthErrorCode::AccountExistsWithDifferentCredential,
                ));
            }
        }

        let key = (provider.provider_id().to_string(), subject);
        let account = state
            .federated
            .entry(key)
            .or_insert_with(|| {
                let uid = new_uid();
                Account {
                    id_token: Some(format!("memory-token-{}", uid)),
                    uid,
                    email,
                    display_name: None,
                }
            })
            .clone();
        Ok(account)
    }
}

/// Profile store backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<AccountId, UserProfile>>,
    fail_writes: AtomicBool,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, as a store outage would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> GatewayResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(GatewayError::profile_store("profile store is unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, uid: &AccountId) -> GatewayResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(uid).cloned())
    }

    async fn create(&self, uid: &AccountId, profile: &UserProfile) -> GatewayResult<()> {
        self.check_writable()?;
        self.profiles
            .write()
            .await
            .insert(uid.clone(), profile.clone());
        Ok(())
    }

    async fn merge_last_login(&self, uid: &AccountId, at: DateTime<Utc>) -> GatewayResult<()> {
        self.check_writable()?;
        match self.profiles.write().await.get_mut(uid) {
            Some(profile) => {
                profile.last_login = Some(at);
                Ok(())
            }
            // A merge on a missing document has nothing to attach the other fields to
            None => Err(GatewayError::profile_store(format!("users/{} not found", uid))),
        }
    }

    async fn check(&self) -> GatewayResult<()> {
        Ok(())
    }
}
