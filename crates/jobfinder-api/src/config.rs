//! API configuration.

use std::fmt;
use std::str::FromStr;

/// Where accounts and profile documents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthBackend {
    /// Firebase Authentication + Firestore
    Firebase,
    /// Process-local maps, for local development and tests
    Memory,
}

impl AuthBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthBackend::Firebase => "firebase",
            AuthBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for AuthBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuthBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "firebase" => Ok(AuthBackend::Firebase),
            "memory" | "in-memory" => Ok(AuthBackend::Memory),
            other => Err(format!("unknown auth backend: {}", other)),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second
    pub rate_limit_rps: u32,
    /// Stricter per-IP limit for the /api/auth routes
    pub auth_rate_limit_rps: u32,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    pub metrics_enabled: bool,
    pub auth_backend: AuthBackend,
    /// Mark the session cookie `Secure`
    pub session_cookie_secure: bool,
    /// Rate-limit on `X-Forwarded-For` rather than the peer address
    pub trust_proxy_headers: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            auth_rate_limit_rps: 5,
            max_body_size: 1024 * 1024, // 1MB
            environment: "development".to_string(),
            metrics_enabled: true,
            auth_backend: AuthBackend::Firebase,
            session_cookie_secure: false,
            trust_proxy_headers: false,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let production = environment.to_lowercase() == "production";

        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            auth_rate_limit_rps: std::env::var("AUTH_RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            auth_backend: std::env::var("AUTH_BACKEND")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(AuthBackend::Firebase),
            session_cookie_secure: std::env::var("SESSION_COOKIE_SECURE")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(production),
            trust_proxy_headers: std::env::var("TRUST_PROXY_HEADERS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            environment,
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "API_PORT",
            "ENVIRONMENT",
            "AUTH_BACKEND",
            "SESSION_COOKIE_SECURE",
            "AUTH_RATE_LIMIT_RPS",
            "TRUST_PROXY_HEADERS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ApiConfig::from_env();
        assert_eq!(config.port, 8000);
        assert_eq!(config.auth_rate_limit_rps, 5);
        assert_eq!(config.auth_backend, AuthBackend::Firebase);
        assert!(!config.session_cookie_secure);
        assert!(!config.trust_proxy_headers);
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn test_production_defaults_to_secure_cookie() {
        clear_env();
        std::env::set_var("ENVIRONMENT", "Production");
        std::env::set_var("AUTH_BACKEND", "memory");
        std::env::set_var("API_PORT", "not-a-port");

        let config = ApiConfig::from_env();
        assert!(config.is_production());
        assert!(config.session_cookie_secure);
        assert_eq!(config.auth_backend, AuthBackend::Memory);
        assert_eq!(config.port, 8000);
        clear_env();
    }
}
