//! API client configuration.
//!
//! # Responsibility
//! - Resolve base URL, bearer token, timeout and edit ordering from the
//!   process environment.
//!
//! # Invariants
//! - `base_url` is an absolute http(s) URL without a trailing slash.
//! - `timeout` is within `1..=300` seconds.

use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const ENV_API_URL: &str = "PRESSBOARD_API_URL";
pub const ENV_API_TOKEN: &str = "PRESSBOARD_API_TOKEN";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "PRESSBOARD_HTTP_TIMEOUT_SECS";
pub const ENV_EDIT_ORDERING: &str = "PRESSBOARD_EDIT_ORDERING";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;

/// How concurrent field edits on the same news item are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditOrdering {
    /// Requests for different fields of one item may overlap; the last
    /// response to arrive wins.
    #[default]
    LastWriteWins,
    /// One in-flight request per item; later edits wait their turn.
    PerItem,
}

impl EditOrdering {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "last_write_wins" | "lww" => Some(Self::LastWriteWins),
            "per_item" => Some(Self::PerItem),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidUrl(String),
    InvalidTimeout(String),
    InvalidEditOrdering(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(name) => write!(f, "environment variable `{name}` is not set"),
            Self::InvalidUrl(value) => write!(f, "api url must be absolute http(s), got `{value}`"),
            Self::InvalidTimeout(value) => write!(
                f,
                "http timeout must be 1..={MAX_TIMEOUT_SECS} seconds, got `{value}`"
            ),
            Self::InvalidEditOrdering(value) => write!(
                f,
                "unsupported edit ordering `{value}`; expected last_write_wins|per_item"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Settings used to build an `ApiClient` and the classification editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout: Duration,
    pub edit_ordering: EditOrdering,
}

impl ApiConfig {
    /// Creates a config with defaults for everything but the base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            auth_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            edit_ordering: EditOrdering::default(),
        })
    }

    /// Sets the bearer token. Blank tokens clear it.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        let trimmed = token.trim();
        self.auth_token = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_edit_ordering(mut self, ordering: EditOrdering) -> Self {
        self.edit_ordering = ordering;
        self
    }

    /// Reads `PRESSBOARD_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_API_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_URL))?;
        let mut config = Self::new(&base_url)?;

        if let Some(token) = lookup(ENV_API_TOKEN) {
            config = config.with_auth_token(token);
        }
        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT_SECS) {
            config = config.with_timeout(parse_timeout(&raw)?);
        }
        if let Some(raw) = lookup(ENV_EDIT_ORDERING) {
            let ordering =
                EditOrdering::parse(&raw).ok_or_else(|| ConfigError::InvalidEditOrdering(raw))?;
            config = config.with_edit_ordering(ordering);
        }

        Ok(config)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if (1..=MAX_TIMEOUT_SECS).contains(&secs) => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
