//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_cookies::CookieManagerLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::auth::{login, logout, register, social_sign_in};
use crate::handlers::jobs::{get_job, list_jobs};
use crate::handlers::session::current_session;
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Credential-bearing routes get a tighter per-IP budget
    let trust_proxy = state.config.trust_proxy_headers;
    let auth_rate_limiter = Arc::new(
        RateLimiterCache::new(state.config.auth_rate_limit_rps).with_trusted_proxy(trust_proxy),
    );
    let rate_limiter =
        Arc::new(RateLimiterCache::new(state.config.rate_limit_rps).with_trusted_proxy(trust_proxy));

    let auth_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/social/:provider", post(social_sign_in))
        .route("/auth/logout", post(logout))
        .layer(middleware::from_fn_with_state(
            auth_rate_limiter,
            rate_limit_middleware,
        ));

    let read_routes = Router::new()
        .route("/session", get(current_session))
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(get_job))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let api_routes = Router::new().merge(auth_routes).merge(read_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(CookieManagerLayer::new())
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
