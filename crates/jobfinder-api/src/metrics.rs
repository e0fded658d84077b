//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "jobfinder_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jobfinder_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "jobfinder_http_requests_in_flight";

    // Sessions
    pub const SESSIONS_ACTIVE: &str = "jobfinder_sessions_active";

    // Catalog
    pub const JOB_SEARCHES_TOTAL: &str = "jobfinder_job_searches_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "jobfinder_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Update the live sessions gauge.
pub fn set_active_sessions(count: usize) {
    gauge!(names::SESSIONS_ACTIVE).set(count as f64);
}

/// Record a catalog search and whether it matched anything.
pub fn record_job_search(results: usize) {
    let labels = [("empty", (results == 0).to_string())];
    counter!(names::JOB_SEARCHES_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

fn numeric_segment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/[0-9]+(/|$)").expect("valid regex"))
}

fn provider_segment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/auth/social/[a-zA-Z0-9_.-]+").expect("valid regex"))
}

/// Sanitize path for metrics labels (job ids, provider names).
fn sanitize_path(path: &str) -> String {
    let path = numeric_segment().replace_all(path, "/:id$1");
    let path = provider_segment().replace_all(&path, "/auth/social/:provider");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/api/jobs/42"), "/api/jobs/:id");
        assert_eq!(
            sanitize_path("/api/auth/social/google"),
            "/api/auth/social/:provider"
        );
        assert_eq!(sanitize_path("/api/jobs"), "/api/jobs");
    }
}
