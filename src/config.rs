//! Configuration management for lfmcli.
//!
//! Settings come from environment variables, optionally pre-loaded from a
//! `.env` file in the local data directory. The resolution order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! The library itself never reads the environment directly: it takes a
//! [`Config`] built from any [`ConfigSource`].

use std::{collections::HashMap, env, path::PathBuf, time::Duration};

use crate::{Res, error::LastfmError};

pub const API_KEY: &str = "LASTFM_API_KEY";
pub const API_SECRET: &str = "LASTFM_API_SECRET";
pub const API_URL: &str = "LASTFM_API_URL";
pub const AUTH_URL: &str = "LASTFM_AUTH_URL";
pub const DEFAULT_LIMIT: &str = "LASTFM_DEFAULT_LIMIT";
pub const SESSION_KEY: &str = "LASTFM_SESSION_KEY";
pub const USER: &str = "LASTFM_USER";
pub const HTTP_TIMEOUT_SECS: &str = "LASTFM_HTTP_TIMEOUT_SECS";

const FALLBACK_LIMIT: u32 = 50;
const FALLBACK_TIMEOUT_SECS: u64 = 30;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives at:
/// - Linux: `~/.local/share/lfmcli/.env`
/// - macOS: `~/Library/Application Support/lfmcli/.env`
/// - Windows: `%LOCALAPPDATA%/lfmcli/.env`
///
/// A missing file is not an error, since every setting can also come from the
/// process environment. An unreadable or malformed file is.
pub async fn load_env() -> Res<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if async_fs::metadata(&path).await.is_ok() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("lfmcli/.env");
    path
}

/// Anything that can hand out plain string settings by name.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads settings from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    pub api_url: String,
    /// Page users visit to approve access. Only needed by the handshake.
    pub auth_url: Option<String>,
    pub default_limit: u32,
    /// Session key issued earlier, used instead of running the handshake.
    pub session_key: Option<String>,
    /// Username used when a fetch command does not name one.
    pub user: Option<String>,
    pub http_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, LastfmError> {
        Self::from_source(&EnvSource)
    }

    /// Builds the configuration, failing on the first missing or invalid
    /// required setting.
    pub fn from_source(source: &impl ConfigSource) -> Result<Self, LastfmError> {
        Ok(Self {
            api_key: required(source, API_KEY)?,
            api_secret: required(source, API_SECRET)?,
            api_url: required(source, API_URL)?,
            auth_url: optional(source, AUTH_URL),
            default_limit: number(source, DEFAULT_LIMIT, FALLBACK_LIMIT)?,
            session_key: optional(source, SESSION_KEY),
            user: optional(source, USER),
            http_timeout: Duration::from_secs(number(
                source,
                HTTP_TIMEOUT_SECS,
                FALLBACK_TIMEOUT_SECS,
            )?),
        })
    }
}

fn optional(source: &impl ConfigSource, key: &str) -> Option<String> {
    source
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(source: &impl ConfigSource, key: &str) -> Result<String, LastfmError> {
    optional(source, key)
        .ok_or_else(|| LastfmError::Configuration(format!("{} must be set", key)))
}

fn number<N>(source: &impl ConfigSource, key: &str, fallback: N) -> Result<N, LastfmError>
where
    N: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = optional(source, key) else {
        return Ok(fallback);
    };

    match raw.parse::<N>() {
        Ok(n) if n > N::default() => Ok(n),
        _ => Err(LastfmError::Configuration(format!(
            "{} must be a positive number, got {:?}",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_number_rejects_zero() {
        let src = source(&[(DEFAULT_LIMIT, "0")]);
        let err = number(&src, DEFAULT_LIMIT, 50u32).unwrap_err();
        assert!(matches!(err, LastfmError::Configuration(_)));
    }

    #[test]
    fn test_optional_treats_blank_as_absent() {
        let src = source(&[(AUTH_URL, "   ")]);
        assert_eq!(optional(&src, AUTH_URL), None);
    }
}
