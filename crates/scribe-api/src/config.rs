//! API configuration.

/// Origins the browser frontends are served from. Anything else is refused
/// by the CORS layer.
const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "https://deployedApp.com"];

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind host
    pub host: String,
    /// Listen port (0 lets the system assign one)
    pub port: u16,
    /// Environment label (`NODE_ENV`); `test` suppresses the startup
    /// database probe
    pub environment: Option<String>,
    /// CORS exact-origin allowlist
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            environment: None,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            environment: std::env::var("NODE_ENV").ok(),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| {
                    DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
                }),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
        }
    }

    /// Check if running under the test configuration.
    pub fn is_test(&self) -> bool {
        self.environment.as_deref() == Some("test")
    }
}
