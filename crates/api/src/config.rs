use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("DATABASE_URL is required when STORE_BACKEND=postgres")]
    MissingDatabaseUrl,
}

/// Which key-value substrate backs the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            _ => Err(()),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    pub store_backend: StoreBackend,
    /// PostgreSQL connection URL, required for the postgres backend.
    pub database_url: Option<String>,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub jwt_ttl_secs: i64,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3030,
            store_backend: StoreBackend::Memory,
            database_url: None,
            db_max_connections: 20,
            db_min_connections: 5,
            jwt_secret: "dev-secret-change-me-in-production".to_string(),
            jwt_ttl_secs: 86_400,
            event_bus_capacity: 1024,
            max_body_bytes: 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

fn parsed<T: FromStr>(
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to [`Default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT", "u16", defaults.port)?,
            store_backend: parsed(
                "STORE_BACKEND",
                "store backend (memory|postgres)",
                defaults.store_backend,
            )?,
            database_url: env::var("DATABASE_URL").ok(),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", "u32", defaults.db_max_connections)?,
            db_min_connections: parsed("DB_MIN_CONNECTIONS", "u32", defaults.db_min_connections)?,
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_ttl_secs: parsed("JWT_TTL_SECS", "i64", defaults.jwt_ttl_secs)?,
            event_bus_capacity: parsed("EVENT_BUS_CAPACITY", "usize", defaults.event_bus_capacity)?,
            max_body_bytes: parsed("MAX_BODY_BYTES", "usize", defaults.max_body_bytes)?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        if config.store_backend == StoreBackend::Postgres && config.database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(config)
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
