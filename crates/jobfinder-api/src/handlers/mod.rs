//! HTTP request handlers.

pub mod auth;
pub mod health;
pub mod jobs;
pub mod session;

pub use health::{health, ready};
