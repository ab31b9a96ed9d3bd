use dotenvy::dotenv;
use std::{env, fs, path::Path};

use warfront_game::balance::BalanceConfig;
use warfront_types::errors::{AppError, ApplicationError};

const DEFAULT_ARMY_SPEED: f64 = 2.0;
const DEFAULT_POWER_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    /// Tiles per hour at speed factor 1.0.
    pub army_speed: f64,
    pub power_cache_ttl_secs: u64,
    pub balance: BalanceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            army_speed: DEFAULT_ARMY_SPEED,
            power_cache_ttl_secs: DEFAULT_POWER_CACHE_TTL_SECS,
            balance: BalanceConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ApplicationError> {
        dotenv().ok();

        let army_speed = match env::var("WARFRONT_ARMY_SPEED") {
            Ok(val) => match val.parse::<f64>() {
                Ok(speed) if speed > 0.0 => speed,
                _ => {
                    return Err(AppError::InvalidConfigValue {
                        key: "WARFRONT_ARMY_SPEED",
                        value: val,
                    }
                    .into());
                }
            },
            Err(_) => DEFAULT_ARMY_SPEED,
        };

        let power_cache_ttl_secs = match env::var("WARFRONT_POWER_CACHE_TTL_SECS") {
            Ok(val) => val
                .parse::<u64>()
                .map_err(|_| AppError::InvalidConfigValue {
                    key: "WARFRONT_POWER_CACHE_TTL_SECS",
                    value: val.clone(),
                })?,
            Err(_) => DEFAULT_POWER_CACHE_TTL_SECS,
        };

        let balance = match env::var("WARFRONT_BALANCE_FILE") {
            Ok(path) => load_balance(path)?,
            Err(_) => BalanceConfig::default(),
        };

        Ok(Self {
            army_speed,
            power_cache_ttl_secs,
            balance,
        })
    }
}

/// Reads a TOML balance file. Missing sections and keys keep their defaults.
pub fn load_balance(path: impl AsRef<Path>) -> Result<BalanceConfig, ApplicationError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::InvalidBalanceConfig(format!("{}: {}", path.display(), e))
    })?;
    parse_balance(&raw)
}

pub fn parse_balance(raw: &str) -> Result<BalanceConfig, ApplicationError> {
    let balance: BalanceConfig =
        toml::from_str(raw).map_err(|e| AppError::InvalidBalanceConfig(e.to_string()))?;
    balance.validate()?;
    Ok(balance)
}
