//! Firebase Authentication client.
//!
//! Talks to the Identity Toolkit v1 REST API with the project's web API key:
//! email/password sign-up and sign-in, OAuth (IdP) sign-in and display name
//! updates. Provider rejections are decoded into [`AuthErrorCode`].

pub mod client;
pub mod error;
pub mod metrics;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use client::{IdentityConfig, IdentityToolkitClient};
pub use error::{AuthErrorCode, IdentityError, IdentityResult};
pub use types::{IdpSignInResponse, SignInResponse};
