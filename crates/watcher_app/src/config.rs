use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;
use watcher_engine::{
    system_clock, ApiSettings, LoopSettings, TelegramSettings, DEFAULT_ENDPOINT,
    DEFAULT_TELEGRAM_API,
};

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const RETRY_TIME: &str = "RETRY_TIME";
pub const PRACTICUM_ENDPOINT: &str = "PRACTICUM_ENDPOINT";
pub const TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
pub const ANNOUNCE_UNKNOWN_STATUS: &str = "ANNOUNCE_UNKNOWN_STATUS";

const DEFAULT_RETRY_SECS: u64 = 600;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Everything the watcher needs, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
    pub poll_interval: Duration,
    pub endpoint: Url,
    pub telegram_api: Url,
    pub request_timeout: Duration,
    pub announce_unknown_status: bool,
}

impl Config {
    /// Builds the configuration from a variable lookup (the process
    /// environment in production). Every missing secret is reported at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Empty values count as absent.
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |name: &'static str| {
            let value = get(name);
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };
        let practicum_token = required(PRACTICUM_TOKEN);
        let telegram_token = required(TELEGRAM_TOKEN);
        let chat_id = required(TELEGRAM_CHAT_ID);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let poll_interval = Duration::from_secs(parse_secs(
            RETRY_TIME,
            get(RETRY_TIME),
            DEFAULT_RETRY_SECS,
        )?);
        let request_timeout = Duration::from_secs(parse_secs(
            REQUEST_TIMEOUT,
            get(REQUEST_TIMEOUT),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let endpoint = parse_url(
            PRACTICUM_ENDPOINT,
            get(PRACTICUM_ENDPOINT).as_deref().unwrap_or(DEFAULT_ENDPOINT),
        )?;
        let telegram_api = parse_url(
            TELEGRAM_API_URL,
            get(TELEGRAM_API_URL)
                .as_deref()
                .unwrap_or(DEFAULT_TELEGRAM_API),
        )?;
        let announce_unknown_status = match get(ANNOUNCE_UNKNOWN_STATUS) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                name: ANNOUNCE_UNKNOWN_STATUS,
                reason: format!("expected true/false, got {raw:?}"),
            })?,
            None => false,
        };

        Ok(Config {
            practicum_token,
            telegram_token,
            chat_id,
            poll_interval,
            endpoint,
            telegram_api,
            request_timeout,
            announce_unknown_status,
        })
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            request_timeout: self.request_timeout,
            ..ApiSettings::new(self.endpoint.clone(), self.practicum_token.clone())
        }
    }

    pub fn telegram_settings(&self) -> TelegramSettings {
        TelegramSettings {
            request_timeout: self.request_timeout,
            ..TelegramSettings::new(
                self.telegram_api.clone(),
                self.telegram_token.clone(),
                self.chat_id.clone(),
            )
        }
    }

    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            interval: self.poll_interval,
            announce_unknown_status: self.announce_unknown_status,
            clock: system_clock(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("poll_interval", &self.poll_interval)
            .field("endpoint", &self.endpoint.as_str())
            .field("telegram_api", &self.telegram_api.as_str())
            .field("request_timeout", &self.request_timeout)
            .field("announce_unknown_status", &self.announce_unknown_status)
            .finish()
    }
}

fn parse_secs(name: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(err) => Err(ConfigError::Invalid {
            name,
            reason: format!("{raw:?}: {err}"),
        }),
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|err| ConfigError::Invalid {
        name,
        reason: format!("{raw:?}: {err}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("{raw:?} is not an http(s) url"),
        });
    }
    Ok(url)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
