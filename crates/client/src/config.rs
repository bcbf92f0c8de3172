//! Client configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use documents::DocumentStyle;
use domain::{BusinessSettings, CURRENCY_SYMBOL};

use crate::error::ConfigError;

const DEFAULT_API_URL: &str = "http://localhost:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOG_LEVEL: &str = "info";
const MINUTES_PER_DAY: i32 = 24 * 60;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::Invalid {
                key: "POS_LOG_FORMAT",
                value: s.to_string(),
                reason: "expected `compact` or `json`".to_string(),
            }),
        }
    }
}

/// Client configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `POS_API_URL`: backend base URL (default: `"http://localhost:8001"`)
/// - `POS_API_TOKEN`: bearer token from a previous `login` (default: none)
/// - `POS_TIMEOUT_SECS`: per-request timeout (default: `15`)
/// - `POS_CURRENCY_SYMBOL`: symbol printed before amounts (default: `"₹"`)
/// - `POS_INVOICE_SEQUENCE_START`: last local invoice number issued (default: `0`)
/// - `POS_UTC_OFFSET_MINUTES`: offset used when printing dates (default: `0`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `POS_LOG_FORMAT`: `compact` or `json` (default: `compact`)
///
/// Unset and blank variables take the default; malformed ones are an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub currency_symbol: String,
    pub invoice_sequence_start: u64,
    pub utc_offset_minutes: i32,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let api_url = match var("POS_API_URL") {
            Some(url) => normalize_url(&url)?,
            None => defaults.api_url,
        };
        let timeout = match var("POS_TIMEOUT_SECS") {
            Some(raw) => match parse::<u64>("POS_TIMEOUT_SECS", &raw)? {
                0 => {
                    return Err(ConfigError::Invalid {
                        key: "POS_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                secs => Duration::from_secs(secs),
            },
            None => defaults.timeout,
        };
        let invoice_sequence_start = match var("POS_INVOICE_SEQUENCE_START") {
            Some(raw) => parse("POS_INVOICE_SEQUENCE_START", &raw)?,
            None => defaults.invoice_sequence_start,
        };
        let utc_offset_minutes = match var("POS_UTC_OFFSET_MINUTES") {
            Some(raw) => {
                let minutes: i32 = parse("POS_UTC_OFFSET_MINUTES", &raw)?;
                if minutes.abs() >= MINUTES_PER_DAY {
                    return Err(ConfigError::Invalid {
                        key: "POS_UTC_OFFSET_MINUTES",
                        value: raw,
                        reason: "must be less than a day".to_string(),
                    });
                }
                minutes
            }
            None => defaults.utc_offset_minutes,
        };
        let log_format = match var("POS_LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            api_url,
            api_token: var("POS_API_TOKEN"),
            timeout,
            currency_symbol: var("POS_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            invoice_sequence_start,
            utc_offset_minutes,
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format,
        })
    }

    /// Replaces the backend base URL, validating it like `POS_API_URL`.
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_url(url.trim())?;
        Ok(self)
    }

    /// Returns the absolute URL of a backend path such as `/invoices/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Combines the business profile with the locally configured currency and offset.
    pub fn document_style(&self, settings: &BusinessSettings) -> DocumentStyle {
        DocumentStyle::from_settings(settings)
            .with_currency_symbol(self.currency_symbol.clone())
            .with_utc_offset_minutes(self.utc_offset_minutes)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            currency_symbol: CURRENCY_SYMBOL.to_string(),
            invoice_sequence_start: 0,
            utc_offset_minutes: 0,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

fn normalize_url(raw: &str) -> Result<String, ConfigError> {
    let url = reqwest::Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key: "POS_API_URL",
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: "POS_API_URL",
            value: raw.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
