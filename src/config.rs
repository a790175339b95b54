// Client configuration
// Read from HOLIDAZE_* environment variables, falling back to defaults.

use anyhow::Context;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const DEFAULT_SCROLL_DEBOUNCE_MS: u64 = 150;
pub const DEFAULT_SCROLL_THRESHOLD_PX: f64 = 1000.0;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Page size must be at least 1")]
    ZeroPageSize,
}

// Server-side ordering of venue listings by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    // Root of the venue/booking/profile endpoints.
    pub base_url: String,
    // Root of the login/register endpoints.
    pub auth_url: String,
    // Static key sent as `X-Noroff-API-Key` on every authenticated call.
    pub api_key: String,
    pub page_size: u32,
    pub sort_order: SortOrder,
    // `None` leaves the transport default in place.
    pub timeout_ms: Option<u64>,
    pub scroll_debounce_ms: u64,
    pub scroll_threshold_px: f64,
    pub enforce_availability_check: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://v2.api.noroff.dev/holidaze".to_string(),
            auth_url: "https://v2.api.noroff.dev/auth".to_string(),
            api_key: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            sort_order: SortOrder::Desc,
            timeout_ms: None,
            scroll_debounce_ms: DEFAULT_SCROLL_DEBOUNCE_MS,
            scroll_threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            enforce_availability_check: true,
        }
    }
}

impl ClientConfig {
    // Loads configuration from `HOLIDAZE_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
            .context("failed to load client configuration from environment")
    }

    // Builds a configuration from any key lookup, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let page_size = parse_var(&lookup, "HOLIDAZE_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        let timeout_ms = match lookup("HOLIDAZE_TIMEOUT_MS") {
            Some(raw) => Some(raw.trim().parse().map_err(|_| invalid("HOLIDAZE_TIMEOUT_MS", &raw))?),
            None => defaults.timeout_ms,
        };

        Ok(Self {
            base_url: lookup("HOLIDAZE_API_URL").unwrap_or(defaults.base_url),
            auth_url: lookup("HOLIDAZE_AUTH_URL").unwrap_or(defaults.auth_url),
            api_key: lookup("HOLIDAZE_API_KEY").unwrap_or(defaults.api_key),
            page_size,
            sort_order: parse_var(&lookup, "HOLIDAZE_SORT_ORDER", defaults.sort_order)?,
            timeout_ms,
            scroll_debounce_ms: parse_var(
                &lookup,
                "HOLIDAZE_SCROLL_DEBOUNCE_MS",
                defaults.scroll_debounce_ms,
            )?,
            scroll_threshold_px: parse_var(
                &lookup,
                "HOLIDAZE_SCROLL_THRESHOLD_PX",
                defaults.scroll_threshold_px,
            )?,
            enforce_availability_check: parse_bool(
                &lookup,
                "HOLIDAZE_ENFORCE_AVAILABILITY",
                defaults.enforce_availability_check,
            )?,
        })
    }

    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, &raw)),
        None => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None => Ok(default),
        Some("true") | Some("TRUE") | Some("1") => Ok(true),
        Some("false") | Some("FALSE") | Some("0") => Ok(false),
        Some(other) => Err(invalid(key, other)),
    }
}
