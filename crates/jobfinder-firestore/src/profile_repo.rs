//! Typed repository for `users/{uid}` profile documents.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::info;

use jobfinder_models::{format_timestamp, AccountId, Role, UserProfile};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, FromFirestoreValue, ToFirestoreValue, Value};

/// Collection holding one profile document per account.
pub const USERS_COLLECTION: &str = "users";

/// Repository for profile documents.
#[derive(Clone)]
pub struct ProfileRepository {
    client: FirestoreClient,
}

impl ProfileRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Read the profile for an account.
    pub async fn get(&self, uid: &AccountId) -> FirestoreResult<Option<UserProfile>> {
        let doc = self
            .client
            .get_document(USERS_COLLECTION, uid.as_str())
            .await?;

        doc.map(|d| document_to_profile(&d, uid)).transpose()
    }

    /// Write the full profile document, replacing whatever was there.
    pub async fn create(&self, uid: &AccountId, profile: &UserProfile) -> FirestoreResult<()> {
        self.client
            .set_document(USERS_COLLECTION, uid.as_str(), profile_to_fields(profile))
            .await?;
        info!(uid = %uid, user_type = %profile.user_type, "Created profile document");
        Ok(())
    }

    /// Merge `lastLogin` into the document without touching other fields.
    pub async fn merge_last_login(&self, uid: &AccountId, at: DateTime<Utc>) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert("lastLogin".to_string(), format_timestamp(&at).to_firestore_value());

        self.client
            .merge_document(USERS_COLLECTION, uid.as_str(), fields)
            .await?;
        Ok(())
    }
}

/// Encode a profile with the field names and ISO timestamp strings the web
/// client used, so both can read each other's documents.
pub(crate) fn profile_to_fields(profile: &UserProfile) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("email".to_string(), profile.email.to_firestore_value());
    fields.insert("displayName".to_string(), profile.display_name.to_firestore_value());
    fields.insert("userType".to_string(), profile.user_type.as_str().to_firestore_value());
    fields.insert(
        "createdAt".to_string(),
        format_timestamp(&profile.created_at).to_firestore_value(),
    );
    if let Some(last_login) = &profile.last_login {
        fields.insert("lastLogin".to_string(), format_timestamp(last_login).to_firestore_value());
    }
    if let Some(provider) = &profile.auth_provider {
        fields.insert("authProvider".to_string(), provider.to_firestore_value());
    }
    fields
}

pub(crate) fn document_to_profile(doc: &Document, uid: &AccountId) -> FirestoreResult<UserProfile> {
    let user_type: Role = doc
        .get::<String>("userType")
        .ok_or_else(|| FirestoreError::invalid_document(format!("users/{}: missing userType", uid)))?
        .parse()
        .map_err(|e| FirestoreError::invalid_document(format!("users/{}: {}", uid, e)))?;

    let created_at = doc
        .field("createdAt")
        .and_then(DateTime::<Utc>::from_firestore_value)
        .ok_or_else(|| FirestoreError::invalid_document(format!("users/{}: missing createdAt", uid)))?;

    Ok(UserProfile {
        email: doc.get("email"),
        display_name: doc.get("displayName").unwrap_or_default(),
        user_type,
        created_at,
        last_login: doc.get("lastLogin"),
        auth_provider: doc.get("authProvider"),
    })
}
