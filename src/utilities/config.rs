//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` / `GOOGLE_API_KEY` — Gemini API key (required)
//! - `GEMINI_MODEL` — model name (default: `gemini-2.0-flash-exp`)
//! - `GEMINI_BASE_URL` — API host (default: public Gemini endpoint)
//! - `GEMINI_TIMEOUT_SECS` — per-request timeout (default: 120)
//! - `HOST` / `PORT` — bind address (default: `0.0.0.0:8080`)
//! - `CHILD_AGENTS_FILE` — optional YAML file with extra child agents

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::llms::providers::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};

/// Configuration errors surfaced at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Gemini API key is not configured (set GEMINI_API_KEY or GOOGLE_API_KEY)")]
    MissingApiKey,

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// Resolved server settings.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub host: String,
    pub port: u16,
    pub child_agents_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment, reading `.env` first if
    /// one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("GOOGLE_API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;

        let timeout_secs: u64 = parse_or(&non_empty, "GEMINI_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs())?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "GEMINI_TIMEOUT_SECS".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            api_key,
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&non_empty, "PORT", 8080)?,
            child_agents_file: non_empty("CHILD_AGENTS_FILE").map(PathBuf::from),
        })
    }

    /// `host:port` string for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("child_agents_file", &self.child_agents_file)
            .finish()
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
        }),
    }
}
