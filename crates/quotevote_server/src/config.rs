//! Environment-driven server configuration.
//!
//! Every setting has a default; a present but unparsable value fails startup.

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use quotevote_core::default_log_level;
use thiserror::Error;

pub const PORT: &str = "QUOTEVOTE_PORT";
pub const DB_PATH: &str = "QUOTEVOTE_DB_PATH";
pub const LOG_LEVEL: &str = "QUOTEVOTE_LOG_LEVEL";
pub const LOG_DIR: &str = "QUOTEVOTE_LOG_DIR";
pub const BUSY_TIMEOUT_MS: &str = "QUOTEVOTE_BUSY_TIMEOUT_MS";
pub const VOTE_ATTEMPTS: &str = "QUOTEVOTE_VOTE_ATTEMPTS";
pub const SEED: &str = "QUOTEVOTE_SEED";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub busy_timeout: Duration,
    pub vote_attempts: u32,
    pub seed: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_log_dir = env::temp_dir().join("quotevote-logs");

        Ok(Self {
            port: try_load(&lookup, PORT, "8080")?,
            db_path: try_load(&lookup, DB_PATH, "quotevote.sqlite3")?,
            log_level: lookup(LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: lookup(LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or(default_log_dir),
            busy_timeout: Duration::from_millis(try_load(&lookup, BUSY_TIMEOUT_MS, "5000")?),
            vote_attempts: at_least_one(try_load(&lookup, VOTE_ATTEMPTS, "2")?)?,
            seed: parse_flag(SEED, lookup(SEED).as_deref().unwrap_or("true"))?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());

    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value,
        reason: e.to_string(),
    })
}

fn at_least_one(attempts: u32) -> Result<u32, ConfigError> {
    if attempts == 0 {
        return Err(ConfigError::Invalid {
            key: VOTE_ATTEMPTS,
            value: attempts.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(attempts)
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected true|false".to_string(),
        }),
    }
}
