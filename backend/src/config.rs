//! Configuration management for the letter quotation server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with LQ_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::Catalog;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Login and token configuration
    pub auth: AuthConfig,

    /// Company details printed on quotation documents
    pub company: CompanyConfig,

    /// Pricing catalog override; the built-in catalog is used when absent
    #[serde(default)]
    pub catalog: Option<Catalog>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// When false every request acts as the guest user
    pub enabled: bool,

    /// Secret key for signing JWT tokens
    pub jwt_secret: String,

    /// Access token expiration in seconds
    pub token_expiry: i64,

    /// Account seeded at startup
    pub default_username: String,
    pub default_password: String,

    /// Whether new accounts may be created through the API
    pub allow_registration: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompanyConfig {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("LQ_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("auth.enabled", true)?
            .set_default("auth.jwt_secret", "development-secret-key")?
            .set_default("auth.token_expiry", 3600)?
            .set_default("auth.default_username", "admin")?
            .set_default("auth.default_password", "signcraft3d")?
            .set_default("auth.allow_registration", true)?
            .set_default("company.name", "SignCraft 3D")?
            .set_default("company.email", "info@signcraft3d.com")?
            .set_default("company.phone", "+1 (555) 123-4567")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (LQ prefix)
            .add_source(
                Environment::with_prefix("LQ")
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

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jwt_secret: "development-secret-key".to_string(),
            token_expiry: 3600,
            default_username: "admin".to_string(),
            default_password: "signcraft3d".to_string(),
            allow_registration: true,
        }
    }
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: "SignCraft 3D".to_string(),
            email: "info@signcraft3d.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            company: CompanyConfig::default(),
            catalog: None,
        }
    }
}
