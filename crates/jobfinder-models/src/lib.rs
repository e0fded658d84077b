//! Shared data models for the JobFinder backend.
//!
//! This crate provides Serde-serializable types for:
//! - Account roles and their landing pages
//! - User profile documents stored in Firestore
//! - Social sign-in providers and session persistence modes
//! - Job postings and catalog filters

pub mod auth;
pub mod job;
pub mod profile;
pub mod role;

// Re-export common types
pub use auth::{
    Persistence, SessionId, SocialCredential, SocialProvider, SocialProviderParseError,
};
pub use job::{
    format_inr, JobFilter, JobPosting, JobType, JobTypeParseError, SalaryBracket,
    SalaryBracketParseError, SalaryRange,
};
pub use profile::{format_timestamp, AccountId, UserProfile};
pub use role::{Role, RoleParseError};
