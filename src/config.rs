// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Reads a backend selector such as `HUB_STORE=memory`.
///
/// Missing means the default; an unrecognized value is a configuration
/// error, since silently falling back would pick the wrong backend.
macro_rules! backend_choice {
    // ---
    ($key:literal, $default:literal, [$($name:literal),+]) => {{
        let value = std::env::var($key).unwrap_or_else(|_| $default.to_string());
        if ![$($name),+].contains(&value.as_str()) {
            anyhow::bail!(concat!("Invalid configuration for ", $key, ": {:?}"), value);
        }
        value
    }};
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub sessions: SessionConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            store: StoreBackend::from_env()?,
            sessions: SessionConfig::from_env()?,
            server: ServerConfig::from_env()?,
        })
    }
}

// ============================================================
// Database configuration
// ============================================================

mod database {
    // ---
    use super::*;

    /// Where tutorials, users, comments and reactions are persisted.
    #[derive(Debug, Clone)]
    pub enum StoreBackend {
        /// PostgreSQL through a SQLx pool.
        Postgres(DatabaseConfig),

        /// Process-local store; contents vanish on restart.
        Memory,
    }

    impl StoreBackend {
        /// Selects the backend from `HUB_STORE` (`postgres` by default).
        ///
        /// # Errors
        /// Returns an error for an unknown backend name, or when PostgreSQL
        /// is selected without `DATABASE_URL`.
        pub fn from_env() -> Result<Self> {
            // ---
            let backend = backend_choice!("HUB_STORE", "postgres", ["postgres", "memory"]);

            if backend == "memory" {
                return Ok(StoreBackend::Memory);
            }
            Ok(StoreBackend::Postgres(DatabaseConfig::from_env()?))
        }
    }

    /// Database-related configuration derived from environment variables.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// PostgreSQL connection string.
        pub database_url: String,

        /// Number of retry attempts when initializing the database connection. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a connection from the pool. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Minimum number of connections to keep in the pool, even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections to be open concurrently. Defaults to 15
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if required configuration is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("HUB_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs = optional_env_parse!("HUB_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("HUB_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("HUB_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }
}
pub use database::{DatabaseConfig, StoreBackend};

// ============================================================
// Session configuration
// ============================================================

mod sessions {
    // ---
    use super::*;

    /// Where session tokens live.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SessionBackend {
        /// Redis at the given URL.
        Redis { url: String },

        /// Process-local map.
        Memory,
    }

    /// Upper bound on `HUB_SESSION_TTL_SEC`; larger values are clamped.
    pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

    /// Session-related configuration.
    #[derive(Debug, Clone)]
    pub struct SessionConfig {
        pub backend: SessionBackend,

        /// Lifetime of a session token. Defaults to 7 days.
        pub ttl: Duration,
    }

    impl SessionConfig {
        /// Builds a [`SessionConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error for an unknown backend name, when Redis is
        /// selected without `HUB_REDIS_URL`, or for a zero TTL.
        pub fn from_env() -> Result<Self> {
            // ---
            let backend = backend_choice!("HUB_SESSION_STORE", "redis", ["redis", "memory"]);
            let backend = if backend == "memory" {
                SessionBackend::Memory
            } else {
                SessionBackend::Redis {
                    url: required_env!("HUB_REDIS_URL"),
                }
            };

            let ttl_secs = optional_env_parse!("HUB_SESSION_TTL_SEC", u64, 604_800);
            if ttl_secs == 0 {
                anyhow::bail!("Invalid configuration for HUB_SESSION_TTL_SEC: must be at least 1");
            }
            if ttl_secs > MAX_SESSION_TTL_SECS {
                tracing::warn!(
                    "HUB_SESSION_TTL_SEC={ttl_secs} exceeds {MAX_SESSION_TTL_SECS}, clamping"
                );
            }
            let ttl_secs = ttl_secs.min(MAX_SESSION_TTL_SECS);

            Ok(Self {
                backend,
                ttl: Duration::from_secs(ttl_secs),
            })
        }
    }
}
pub use sessions::{SessionBackend, SessionConfig, MAX_SESSION_TTL_SECS};

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---
    use super::*;

    /// Which metrics implementation backs `/metrics`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MetricsBackend {
        Noop,
        Prometheus,
    }

    /// HTTP listener and observability settings.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Address the listener binds to. Defaults to `127.0.0.1:8080`.
        pub bind_addr: String,

        pub metrics: MetricsBackend,
    }

    impl ServerConfig {
        /// Builds a [`ServerConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error for an unknown metrics backend name.
        pub fn from_env() -> Result<Self> {
            // ---
            let bind_addr =
                std::env::var("HUB_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

            let metrics = match backend_choice!("HUB_METRICS_TYPE", "noop", ["noop", "prom"]).as_str()
            {
                "prom" => MetricsBackend::Prometheus,
                _ => MetricsBackend::Noop,
            };

            Ok(Self { bind_addr, metrics })
        }
    }
}
pub use server::{MetricsBackend, ServerConfig};

// ============================================================
// Tests
// ============================================================
