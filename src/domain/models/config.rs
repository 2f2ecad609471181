use serde::{Deserialize, Serialize};

use super::official_description::{FreshnessWindow, DEFAULT_LANGUAGE, DEFAULT_MAX_AGE_HOURS};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Remote TARIC service configuration
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Lookup defaults
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    "taric_live.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    /// `sqlx` connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Remote TARIC lookup service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoteConfig {
    /// SOAP endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Optional `SOAPAction` header value
    #[serde(default)]
    pub soap_action: Option<String>,
}

fn default_endpoint() -> String {
    "https://ec.europa.eu/taxation_customs/dds2/taric/services/goods".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            soap_action: None,
        }
    }
}

/// Defaults applied to lookups that leave language or max age unset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LookupConfig {
    /// Fallback language tag
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Freshness window in hours; `null` disables expiry
    #[serde(default = "default_max_age_hours")]
    pub default_max_age_hours: Option<u32>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[allow(clippy::unnecessary_wraps)]
const fn default_max_age_hours() -> Option<u32> {
    Some(DEFAULT_MAX_AGE_HOURS)
}

impl LookupConfig {
    pub const fn freshness_window(&self) -> FreshnessWindow {
        FreshnessWindow::from_hours(self.default_max_age_hours)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            default_max_age_hours: default_max_age_hours(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for rolling JSON log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
        }
    }
}
