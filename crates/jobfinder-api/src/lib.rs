//! Axum HTTP API server.
//!
//! This crate provides:
//! - Register / login / social sign-in / logout over the identity gateway
//! - Cookie sessions, with Firebase ID tokens accepted as bearer credentials
//! - The job catalog
//! - Rate limiting, security headers and Prometheus metrics

pub mod auth;
pub mod config;
pub mod cookies;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, AuthBackend};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{JobCatalog, SessionSweeper};
pub use state::AppState;
