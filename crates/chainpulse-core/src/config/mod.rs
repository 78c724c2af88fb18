//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `CHAINPULSE_CONFIG` env var
//! 3. **Environment variables**: `CHAINPULSE__*` env vars override specific
//!    fields, with `__` as the nesting separator
//!
//! # Configuration Sections
//!
//! - [`ServerConfig`]: HTTP server settings (bind address, concurrency)
//! - [`DatabaseConfig`]: Primary store connection settings
//! - [`RefreshConfig`]: Throughput refresh schedule and snapshot window
//! - [`MetricsConfig`]: Prometheus metrics endpoint
//! - [`LoggingConfig`]: Log level and format
//!
//! # Validation
//!
//! Configuration is validated at load time. Invalid configurations (zero
//! refresh interval, zero snapshot window) return errors rather than failing
//! silently on the first refresh tick.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// HTTP server configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// IP address to bind the server to. Defaults to `127.0.0.1`.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port number to listen on. Defaults to `3050`.
    pub bind_port: u16,

    /// Maximum number of concurrent API requests. Defaults to `100`.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_max_concurrent_requests() -> usize {
    100
}

/// Primary store connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL.
    pub url: String,

    /// Maximum pooled connections. Defaults to `10`.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Drop every table in the store schema at startup so the indexer can
    /// rebuild from scratch. Irreversible; defaults to `false` and must be
    /// enabled explicitly.
    #[serde(default)]
    pub reset_on_start: bool,
}

fn default_max_connections() -> u32 {
    10
}

/// Throughput refresh schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between refresh cycles. Must be greater than 0. Defaults to
    /// `10`.
    pub interval_seconds: u64,

    /// Number of most-recent blocks in the snapshot window. Must be greater
    /// than 0. Defaults to `30`.
    pub limit: u32,
}

/// Prometheus metrics collection and export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled. Defaults to `true`.
    pub enabled: bool,
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults
    /// to `"info"`.
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    pub format: String,
}

/// Root application configuration containing all subsystem settings.
///
/// Loaded from a TOML file with `CHAINPULSE__` environment overrides, e.g.
/// `CHAINPULSE__SERVER__BIND_PORT=8080`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Primary store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Throughput refresh configuration.
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Prometheus metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 3050,
            max_concurrent_requests: 100,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/chainpulse".to_string(),
            max_connections: 10,
            reset_on_start: false,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_seconds: 10, limit: 30 }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            refresh: RefreshConfig::default(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// deserialized, or if validation fails.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("environment", "development")?
            .set_default("server.bind_address", "127.0.0.1")?
            .set_default("server.bind_port", 3050)?
            .set_default("server.max_concurrent_requests", 100)?
            .set_default("database.url", "postgres://localhost/chainpulse")?
            .set_default("database.max_connections", 10)?
            .set_default("database.reset_on_start", false)?
            .set_default("refresh.interval_seconds", 10)?
            .set_default("refresh.limit", 30)?
            .set_default("metrics.enabled", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("CHAINPULSE").separator("__"))
            .build()?;

        let config: Self = config_builder.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `config/config.toml` with fallback to
    /// defaults. The path can be overridden via `CHAINPULSE_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or
    /// parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("CHAINPULSE_CONFIG")
            .unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_seconds == 0 {
            return Err(ConfigError::Message(
                "refresh.interval_seconds must be greater than zero".to_string(),
            ));
        }
        if self.refresh.limit == 0 {
            return Err(ConfigError::Message(
                "refresh.limit must be greater than zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
