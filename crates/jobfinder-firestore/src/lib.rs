//! Firestore REST API client.
//!
//! This crate provides:
//! - A thin document client (get / set / merge) over the Firestore v1 REST API
//! - Service account authentication via gcp_auth, or the local emulator
//! - The typed repository for `users/{uid}` profile documents

pub mod client;
pub mod error;
pub mod metrics;
pub mod profile_repo;
pub mod token_cache;
pub mod types;


pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use profile_repo::{ProfileRepository, USERS_COLLECTION};
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
