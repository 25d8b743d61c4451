//! Configuration management for the bakery operations server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with BAKERY__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Accounting export configuration
    pub accounting: AccountingConfig,

    /// Log output configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL. When absent the server runs on demo fixture data.
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountingConfig {
    /// Simulated latency of the mocked Xero export, in milliseconds
    pub export_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Emit one JSON object per log line instead of human-readable text
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("BAKERY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("accounting.export_delay_ms", 1500)?
            .set_default("logging.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BAKERY__ prefix)
            .add_source(
                Environment::with_prefix("BAKERY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// True when no database is configured and the demo fixture store should be used
    pub fn demo_mode(&self) -> bool {
        self.database
            .url
            .as_deref()
            .map_or(true, |url| url.trim().is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                min_connections: 2,
            },
            accounting: AccountingConfig {
                export_delay_ms: 1500,
            },
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_mode_without_url() {
        let config = Config::default();
        assert!(config.demo_mode());
        assert!(!config.is_production());
        assert!(!config.logging.json);
    }

    #[test]
    fn test_blank_url_is_demo_mode() {
        let mut config = Config::default();
        config.database.url = Some("   ".to_string());
        assert!(config.demo_mode());

        config.database.url = Some("postgres://localhost/bakery".to_string());
        assert!(!config.demo_mode());
    }
}
