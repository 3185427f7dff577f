pub mod app_config;
pub mod config;
pub mod request;

pub use app_config::{AppConfig, Environment, ScraperConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use request::ScrapeRequest;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Missing or invalid required parameters: storeId and dealId must be strings")]
    InvalidParameters,
}
