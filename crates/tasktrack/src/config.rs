use std::{env, fmt, str::FromStr, time::Duration};

/// Development-only signing secret used when `JWT_SECRET` is unset.
pub const DEFAULT_JWT_SECRET: &str = "super-secret-key";

/// Deployment environment. Production switches logs to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// `HOST` and `PORT` are read by the CLI parser in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment (default: development)
    pub environment: Environment,
    /// Path to SQLite database file (default: "tasktrack.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Cache TTL in seconds (default: 3600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Upper bound for one cache round trip in milliseconds (default: 250)
    pub cache_op_timeout_ms: u64,
    /// Whole-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// HS256 secret for bearer tokens (default: "super-secret-key")
    pub jwt_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ENVIRONMENT` - `development` or `production` (default: development)
    /// - `SQLITE_PATH` - SQLite database path (default: "tasktrack.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 3600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_OP_TIMEOUT_MS` - Per-call cache timeout (default: 250)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    /// - `JWT_SECRET` - Token signing secret (default: "super-secret-key")
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            environment: parse_var(&lookup, "ENVIRONMENT").unwrap_or_default(),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "tasktrack.db".to_string()),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            cache_ttl_seconds: parse_var(&lookup, "CACHE_TTL_SECONDS").unwrap_or(3600),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES").unwrap_or(10_000),
            cache_op_timeout_ms: parse_var(&lookup, "CACHE_OP_TIMEOUT_MS").unwrap_or(250),
            request_timeout_seconds: parse_var(&lookup, "REQUEST_TIMEOUT_SECONDS").unwrap_or(10),
            jwt_secret: lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn cache_op_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_op_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
