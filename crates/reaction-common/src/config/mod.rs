//! Configuration structs

mod app_config;

pub use app_config::{
    AggregationStrategy, AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment,
    LoggingConfig, ReactionConfig, SnowflakeConfig, StorageBackend, StorageConfig,
    MAX_LIST_LIMIT,
};
