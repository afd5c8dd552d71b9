//! Process configuration, read once at startup from the environment.

use std::time::Duration;

/// Default token lifetime: one hour.
const DEFAULT_JWT_TTL_MS: u64 = 3_600_000;

/// Outbound agent-service timeout.
pub const AGENT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Shared HMAC signing secret (read-only after startup).
    pub jwt_secret: String,
    /// Token lifetime in milliseconds.
    pub jwt_ttl_ms: u64,
    /// Base URL of the external agent service; `None` selects the mock client.
    pub agent_service_url: Option<String>,
    /// Seed credentials for the first admin account, if configured.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let jwt_ttl_ms = std::env::var("JWT_TTL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_JWT_TTL_MS);

        let use_persistent_stores = std::env::var("USE_PERSISTENT_STORES")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jwt_secret,
            jwt_ttl_ms,
            agent_service_url: std::env::var("AGENT_SERVICE_URL").ok(),
            admin_email: std::env::var("ADMIN_EMAIL").ok(),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
            use_persistent_stores,
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }

    /// Test/dev configuration with in-memory stores and the mock agent.
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_ttl_ms: DEFAULT_JWT_TTL_MS,
            agent_service_url: None,
            admin_email: None,
            admin_password: None,
            use_persistent_stores: false,
            database_url: None,
        }
    }
}
