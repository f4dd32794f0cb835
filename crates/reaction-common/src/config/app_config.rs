//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use reaction_core::MAX_WORKER_ID;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub storage: StorageConfig,
    pub reactions: ReactionConfig,
    pub snowflake: SnowflakeConfig,
    pub logging: LoggingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(ConfigError::InvalidValue("APP_ENV", s.to_string())),
        }
    }
}

/// Where reactions are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps; state is lost on restart
    #[default]
    Memory,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(ConfigError::InvalidValue("STORAGE_BACKEND", s.to_string())),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Required when `backend` is `Postgres`
    pub database: Option<DatabaseConfig>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// How per-message counts are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationStrategy {
    /// Cached per-message counters updated from every write
    #[default]
    Incremental,
    /// Count from storage on every summary
    Recompute,
}

impl FromStr for AggregationStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "incremental" => Ok(Self::Incremental),
            "recompute" => Ok(Self::Recompute),
            _ => Err(ConfigError::InvalidValue("REACTION_AGGREGATION", s.to_string())),
        }
    }
}

/// Reaction behaviour settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionConfig {
    #[serde(default)]
    pub aggregation: AggregationStrategy,
    /// Default page size when listing who reacted
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            aggregation: AggregationStrategy::default(),
            list_limit: default_list_limit(),
        }
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_app_name() -> String {
    "reaction-server".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_list_limit() -> u32 {
    25
}

/// Upper bound for `REACTION_LIST_LIMIT`
pub const MAX_LIST_LIMIT: u32 = 100;

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend: StorageBackend = parse_or_default(&lookup, "STORAGE_BACKEND")?;

        let database = match lookup("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            }),
            None if backend == StorageBackend::Postgres => {
                return Err(ConfigError::MissingVar("DATABASE_URL"));
            }
            None => None,
        };

        let list_limit = parse_or(&lookup, "REACTION_LIST_LIMIT", default_list_limit)?;
        if list_limit == 0 || list_limit > MAX_LIST_LIMIT {
            return Err(ConfigError::InvalidValue(
                "REACTION_LIST_LIMIT",
                list_limit.to_string(),
            ));
        }

        let worker_id = parse_or(&lookup, "WORKER_ID", || 0u16)?;
        if worker_id > MAX_WORKER_ID {
            return Err(ConfigError::InvalidValue("WORKER_ID", worker_id.to_string()));
        }

        let json = match lookup("LOG_FORMAT") {
            None => false,
            Some(format) => match format.trim().to_lowercase().as_str() {
                "json" => true,
                "pretty" | "text" => false,
                _ => return Err(ConfigError::InvalidValue("LOG_FORMAT", format)),
            },
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_or_default(&lookup, "APP_ENV")?,
            },
            storage: StorageConfig { backend, database },
            reactions: ReactionConfig {
                aggregation: parse_or_default(&lookup, "REACTION_AGGREGATION")?,
                list_limit,
            },
            snowflake: SnowflakeConfig { worker_id },
            logging: LoggingConfig { json },
        })
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    D: FnOnce() -> T,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr<Err = ConfigError> + Default,
{
    lookup(key).map_or_else(|| Ok(T::default()), |raw| raw.parse())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
