//! Configuration management for the Optical Retail Reporting service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with ORR_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Upstream ERP API configuration
    pub erp: ErpConfig,

    /// Report derivation configuration
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ErpConfig {
    /// Base URL of the ERP REST API, e.g. `https://erp.example.com/api`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Documents requested per upstream page
    pub page_size: u32,

    /// Upper bound on upstream pages walked for one report
    pub max_pages: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    /// GST percentage applied when a line item has no rate of its own
    pub default_gst_rate: Decimal,

    /// Largest page of rows a client may request
    pub max_per_page: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("ORR_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("erp.base_url", "http://localhost:8080/api")?
            .set_default("erp.timeout_secs", 30)?
            .set_default("erp.page_size", 100)?
            .set_default("erp.max_pages", 50)?
            .set_default("reports.default_gst_rate", "12")?
            .set_default("reports.max_per_page", 500)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (ORR_ prefix)
            .add_source(
                Environment::with_prefix("ORR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
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
