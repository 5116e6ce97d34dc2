//! Configuration loader and validator for the homework watcher.
//!
//! Values come from an optional YAML file and are overridden by environment
//! variables (`PRACTICUM_TOKEN`, `TELEGRAM_TOKEN`, `TELEGRAM_CHAT_ID`,
//! `PRACTICUM_ENDPOINT`, `RETRY_PERIOD`).
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_PERIOD_SECS: u64 = 15;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_PRACTICUM_ENDPOINT: &str = "PRACTICUM_ENDPOINT";
pub const ENV_RETRY_PERIOD: &str = "RETRY_PERIOD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("missing required environment variables: {}", .0.join(", "))]
    CredentialsMissing(Vec<&'static str>),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub app: App,
    pub practicum: Practicum,
    pub telegram: Telegram,
}

/// Loop timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct App {
    pub retry_period_secs: u64,
}

impl Default for App {
    fn default() -> Self {
        Self {
            retry_period_secs: DEFAULT_RETRY_PERIOD_SECS,
        }
    }
}

/// Homework API settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Practicum {
    pub token: String,
    pub endpoint: String,
    pub request_timeout_secs: u64,
}

impl Default for Practicum {
    fn default() -> Self {
        Self {
            token: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for Practicum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Practicum")
            .field("endpoint", &self.endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish_non_exhaustive()
    }
}

/// Telegram bot settings.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Telegram {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telegram")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.app.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.practicum.request_timeout_secs)
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        Url::parse(self.practicum.endpoint.trim())
            .map_err(|_| ConfigError::Invalid("practicum.endpoint must be a valid URL"))
    }

    /// Overlay environment values on top of the file values.
    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_PRACTICUM_TOKEN) {
            self.practicum.token = v;
        }
        if let Some(v) = lookup(ENV_TELEGRAM_TOKEN) {
            self.telegram.bot_token = v;
        }
        if let Some(v) = lookup(ENV_TELEGRAM_CHAT_ID) {
            self.telegram.chat_id = v;
        }
        if let Some(v) = lookup(ENV_PRACTICUM_ENDPOINT) {
            self.practicum.endpoint = v;
        }
        if let Some(v) = lookup(ENV_RETRY_PERIOD) {
            self.app.retry_period_secs = v.trim().parse().map_err(|_| {
                ConfigError::Invalid("RETRY_PERIOD must be a whole number of seconds")
            })?;
        }
        Ok(())
    }
}

/// Load configuration from the process environment, an optional `.env` file
/// and an optional YAML file, then validate it.
///
/// An explicitly passed `path` must exist.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let yaml = match path {
        Some(p) => Some(fs::read_to_string(p)?),
        None => None,
    };
    from_sources(yaml.as_deref(), |key| std::env::var(key).ok())
}

/// Build a validated configuration from YAML text and an environment lookup.
pub fn from_sources<F>(yaml: Option<&str>, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match yaml {
        Some(content) if !content.trim().is_empty() => serde_yaml::from_str(content)?,
        _ => Config::default(),
    };
    cfg.apply_env(lookup)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let mut missing = Vec::new();
    if cfg.practicum.token.trim().is_empty() {
        missing.push(ENV_PRACTICUM_TOKEN);
    }
    if cfg.telegram.bot_token.trim().is_empty() {
        missing.push(ENV_TELEGRAM_TOKEN);
    }
    if cfg.telegram.chat_id.trim().is_empty() {
        missing.push(ENV_TELEGRAM_CHAT_ID);
    }
    if !missing.is_empty() {
        return Err(ConfigError::CredentialsMissing(missing));
    }

    if cfg.app.retry_period_secs == 0 {
        return Err(ConfigError::Invalid("app.retry_period_secs must be > 0"));
    }
    if cfg.practicum.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "practicum.request_timeout_secs must be > 0",
        ));
    }
    cfg.endpoint_url()?;

    Ok(())
}

/// Sample YAML configuration.
pub fn example() -> &'static str {
    r#"app:
  retry_period_secs: 15

practicum:
  token: "YOUR_PRACTICUM_OAUTH_TOKEN"
  endpoint: "https://practicum.yandex.ru/api/user_api/homework_statuses/"
  request_timeout_secs: 10

telegram:
  bot_token: "YOUR_TELEGRAM_BOT_TOKEN"
  chat_id: "123456789"
"#
}
