//! Server configuration read from the process environment.
//!
//! | Env Var                 | Default                  |
//! |-------------------------|--------------------------|
//! | `HOST`                  | `0.0.0.0`                |
//! | `PORT`                  | `3000`                   |
//! | `CORS_ORIGINS`          | `http://localhost:5173`  |
//! | `REQUEST_TIMEOUT_SECS`  | `30`                     |
//! | `SHUTDOWN_TIMEOUT_SECS` | `30`                     |
//! | `JWT_SECRET`            | required                 |
//! | `JWT_EXPIRY_HOURS`      | `168`                    |
//! | `FEED_LIMIT`            | `20`                     |
//! | `LEADERBOARD_LIMIT`     | `10`                     |

use std::str::FromStr;

use studyquest_core::activity::MAX_LIST_LIMIT;
use studyquest_ledger::query::ListLimits;

use crate::auth::jwt::{JwtConfig, DEFAULT_EXPIRY_HOURS};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Time in-flight requests get to finish after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Page sizes for the feed and leaderboard when no `limit` is given.
    pub list_limits: ListLimits,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let list_limits = ListLimits {
            feed: list_limit(&lookup, "FEED_LIMIT", ListLimits::default().feed)?,
            leaderboard: list_limit(
                &lookup,
                "LEADERBOARD_LIMIT",
                ListLimits::default().leaderboard,
            )?,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parsed(&lookup, "PORT", 3000)?,
            cors_origins,
            request_timeout_secs: parsed(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: parsed(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)?,
            jwt: JwtConfig {
                secret,
                expiry_hours: parsed(&lookup, "JWT_EXPIRY_HOURS", DEFAULT_EXPIRY_HOURS)?,
            },
            list_limits,
        })
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

/// A default page size must itself be a valid request limit.
fn list_limit(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: i64,
) -> Result<i64, ConfigError> {
    let limit = parsed(lookup, key, default)?;
    if (1..=MAX_LIST_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: limit.to_string(),
        })
    }
}
