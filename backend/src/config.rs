//! Configuration management for CuacaMap
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CUACA__ prefix

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BMKG_BASE_URL: &str = "https://api.bmkg.go.id/publik/prakiraan-cuaca";
pub const DEFAULT_USER_AGENT: &str = "CuacaMap-Backend/2.0.0";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// BMKG forecast API configuration
    pub bmkg: BmkgConfig,

    /// Local datasets
    pub data: DataConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BmkgConfig {
    /// Forecast endpoint, queried with `?adm4=`
    pub base_url: String,

    /// Per-request deadline in seconds
    pub timeout_secs: u64,

    /// User-Agent sent to BMKG
    pub user_agent: String,
}

impl BmkgConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Path of the village dataset (JSON array)
    pub desa_path: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CUACA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CUACA__ prefix)
            .add_source(
                Environment::with_prefix("CUACA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Builder seeded with the in-code defaults only
    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("bmkg.base_url", DEFAULT_BMKG_BASE_URL)?
            .set_default("bmkg.timeout_secs", 15)?
            .set_default("bmkg.user_agent", DEFAULT_USER_AGENT)?
            .set_default("data.desa_path", "data/desa.json")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for BmkgConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BMKG_BASE_URL.to_string(),
            timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
