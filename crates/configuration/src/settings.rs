use chrono::NaiveTime;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default CoinMarketCap endpoint returning the latest listings.
pub const DEFAULT_API_URL: &str =
    "https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest";

/// Converter currency used when `api.params.convert` is absent.
pub const DEFAULT_CONVERTER: &str = "USD";

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the market data API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Sent as the `X-CMC_PRO_API_KEY` header. Usually supplied through the
    /// `CRYPTOREPORT__API__KEY` environment variable rather than the file.
    #[serde(default)]
    pub key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Query parameters forwarded verbatim (e.g. `start`, `limit`, `convert`).
    /// Entries given here are merged over the defaults.
    #[serde(default = "default_params", deserialize_with = "params_over_defaults")]
    pub params: HashMap<String, String>,
}

/// Parameters of the derived report metrics.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Minimum 24h volume (exclusive) for an asset to enter the threshold basket.
    #[serde(default = "default_max_threshold_volume")]
    pub max_threshold_volume: f64,
    /// Number of entries in the best/worst percent-change lists.
    #[serde(default = "default_ranking_crypto")]
    pub ranking_crypto: usize,
    /// Default number of assets in a basket or investment calculation.
    #[serde(default = "default_num_crypto")]
    pub num_crypto: usize,
    /// Directory receiving the dated report files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// When the periodic driver produces a report.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Wall-clock time of the run, `HH:MM` in local time.
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default)]
    pub repeat_interval: RepeatInterval,
}

/// How often the report runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum RepeatInterval {
    #[default]
    #[serde(rename = "daily", alias = "day")]
    Daily,
    #[serde(rename = "weekly", alias = "week")]
    Weekly,
    /// Every minute on the minute; `time` is ignored.
    #[serde(rename = "minutely", alias = "minute")]
    EveryMinute,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Config {
    /// The currency in which every quote figure is read.
    pub fn converter(&self) -> &str {
        self.api
            .params
            .get("convert")
            .map(String::as_str)
            .unwrap_or(DEFAULT_CONVERTER)
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.ranking_crypto == 0 {
            return Err(ConfigError::ValidationError(
                "report.ranking_crypto must be greater than zero".to_string(),
            ));
        }
        if self.report.num_crypto == 0 {
            return Err(ConfigError::ValidationError(
                "report.num_crypto must be greater than zero".to_string(),
            ));
        }
        let threshold = self.report.max_threshold_volume;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "report.max_threshold_volume must be a non-negative number, got {threshold}"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.schedule.fire_time()?;
        Ok(())
    }
}

impl ScheduleConfig {
    /// Parses `time` as `HH:MM`.
    pub fn fire_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.time, "%H:%M").map_err(|e| {
            ConfigError::ValidationError(format!(
                "schedule.time must be HH:MM, got '{}': {}",
                self.time, e
            ))
        })
    }
}

// --- Default Implementations ---
// A config file only needs to name the values it changes.

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            key: String::new(),
            timeout_secs: default_timeout_secs(),
            params: default_params(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_threshold_volume: default_max_threshold_volume(),
            ranking_crypto: default_ranking_crypto(),
            num_crypto: default_num_crypto(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            time: default_time(),
            repeat_interval: RepeatInterval::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_params() -> HashMap<String, String> {
    HashMap::from([
        ("start".to_string(), "1".to_string()),
        ("limit".to_string(), "100".to_string()),
        ("convert".to_string(), DEFAULT_CONVERTER.to_string()),
    ])
}

fn params_over_defaults<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let given = HashMap::<String, String>::deserialize(deserializer)?;
    let mut params = default_params();
    params.extend(given);
    Ok(params)
}

fn default_max_threshold_volume() -> f64 {
    76_000_000.0
}

fn default_ranking_crypto() -> usize {
    10
}

fn default_num_crypto() -> usize {
    20
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("report")
}

fn default_time() -> String {
    "16:30".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
