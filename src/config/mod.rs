use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Prefix shared by every configuration variable, e.g. `STOREFRONT_SERVER__PORT`
pub const ENV_PREFIX: &str = "STOREFRONT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub about: AboutConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Idle time after which a session and its cart are dropped
    #[serde(default = "default_session_expiry")]
    pub expiry_seconds: i64,
    #[serde(default)]
    pub secure_cookie: bool,
    /// How often expired sessions are swept from the store
    #[serde(default = "default_session_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_seed_demo_products")]
    pub seed_demo_products: bool,
}

/// Text shown on the about page
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AboutConfig {
    #[serde(default = "default_about_title")]
    pub title: String,
    #[serde(default = "default_about_subtitle")]
    pub subtitle: String,
    #[serde(default = "default_about_description")]
    pub description: String,
    #[serde(default = "default_about_author")]
    pub author: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    /// OTLP/gRPC collector; span export is off when unset
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

impl Config {
    /// Load configuration from `STOREFRONT_*` environment variables and validate it
    pub fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");
        Self::load(None)
    }

    /// Same as [`Config::from_environment`] but reads from the given variables instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let source = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(vars);

        let settings = config::Config::builder()
            .add_source(source)
            .build()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to load config: {}", e),
            })?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to deserialize config: {}", e),
            })?;

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Request timeout cannot be 0".to_string(),
            });
        }

        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Session cookie name cannot be empty".to_string(),
            });
        }

        if self.session.expiry_seconds <= 0 {
            return Err(ConfigError::ValidationError {
                message: "Session expiry must be positive".to_string(),
            });
        }

        if self.session.cleanup_interval_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Session cleanup interval cannot be 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_timeout(),
            max_request_size: default_max_request_size(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            expiry_seconds: default_session_expiry(),
            secure_cookie: false,
            cleanup_interval_seconds: default_session_cleanup_interval(),
        }
    }
}

impl SessionConfig {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_demo_products: default_seed_demo_products(),
        }
    }
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            title: default_about_title(),
            subtitle: default_about_subtitle(),
            description: default_about_description(),
            author: default_about_author(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            service_version: default_service_version(),
            otlp_endpoint: None,
            log_level: default_log_level(),
            enable_json_logging: false,
        }
    }
}

// Default value functions
pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_max_request_size() -> usize {
    1024 * 1024 // 1MB
}

pub(crate) fn default_cookie_name() -> String {
    "storefront_session".to_string()
}

pub(crate) fn default_session_expiry() -> i64 {
    2 * 60 * 60
}

pub(crate) fn default_session_cleanup_interval() -> u64 {
    60
}

pub(crate) fn default_seed_demo_products() -> bool {
    true
}

pub(crate) fn default_about_title() -> String {
    "About us - Online Store".to_string()
}

pub(crate) fn default_about_subtitle() -> String {
    "About us".to_string()
}

pub(crate) fn default_about_description() -> String {
    "This is an about page".to_string()
}

pub(crate) fn default_about_author() -> String {
    "Developed by: Kenia Toscano".to_string()
}

pub(crate) fn default_service_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests;
