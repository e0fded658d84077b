//! Identity gateway for the JobFinder backend.
//!
//! [`AuthGateway`] turns register / login / social sign-in / logout intents
//! into calls on three ports:
//! - [`IdentityProvider`]: accounts and credentials (Firebase Authentication)
//! - [`ProfileStore`]: `users/{uid}` profile documents (Firestore)
//! - [`SessionStore`]: who is signed in on which browser session
//!
//! Production adapters for the Firebase clients live in [`firebase`];
//! in-memory implementations for local development and tests in [`memory`].

pub mod error;
pub mod firebase;
pub mod gateway;
pub mod memory;
pub mod messages;
pub mod metrics;
pub mod ports;
pub mod session;

pub use error::{AuthErrorCode, GatewayError, GatewayResult};
pub use firebase::FirestoreProfileStore;
pub use gateway::{
    AuthGateway, CurrentUser, LoginRejection, LoginRequest, RegisterRequest, RegistrationOutcome,
    SignedIn, SocialSignInRequest,
};
pub use memory::{InMemoryIdentity, InMemoryProfileStore};
pub use messages::AuthOperation;
pub use ports::{Account, ActiveSession, IdentityProvider, ProfileStore, SessionStore};
pub use session::{InMemorySessionStore, SessionTtl};
