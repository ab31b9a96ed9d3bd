use thiserror::Error;

/// Errors for app logic (jobs, config, caches).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No job handler for {0}")]
    NoJobHandler(String),

    #[error("Invalid balance configuration: {0}")]
    InvalidBalanceConfig(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfigValue { key: &'static str, value: String },

    #[error("Player power cache unavailable: {0}")]
    PowerCache(String),

    #[error("Event dispatch failed: {0}")]
    EventDispatch(String),
}
