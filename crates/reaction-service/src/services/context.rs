//! Service context - dependency container for services
//!
//! Holds the repository, the message and user directories, the id generator,
//! and the shared aggregator needed by services.

use std::sync::Arc;

use tracing::info;

use reaction_common::{AppConfig, ConfigError, ReactionConfig, StorageBackend};
use reaction_core::traits::{MessageDirectory, ReactionRepository, UserDirectory};
use reaction_core::{Snowflake, SnowflakeGenerator};
use reaction_db::{
    MemoryDirectory, MemoryReactionRepository, PgMessageDirectory, PgReactionRepository,
    PgUserDirectory,
};

use super::aggregator::ReactionAggregator;
use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cloning is cheap and every clone shares the same aggregator counters.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    reaction_repo: Arc<dyn ReactionRepository>,

    // Directories
    message_directory: Arc<dyn MessageDirectory>,
    user_directory: Arc<dyn UserDirectory>,

    // Aggregation
    aggregator: Arc<ReactionAggregator>,

    // Settings
    settings: ReactionConfig,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        reaction_repo: Arc<dyn ReactionRepository>,
        message_directory: Arc<dyn MessageDirectory>,
        user_directory: Arc<dyn UserDirectory>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        settings: ReactionConfig,
    ) -> Self {
        let aggregator = Arc::new(ReactionAggregator::new(
            Arc::clone(&reaction_repo),
            settings.aggregation,
        ));

        Self {
            reaction_repo,
            message_directory,
            user_directory,
            aggregator,
            settings,
            snowflake_generator,
        }
    }

    /// Wire up the storage backend named in the configuration
    ///
    /// The memory backend accepts every message and user id. The Postgres
    /// backend connects, bootstraps the reactions table, and checks ids
    /// against the `messages` and `users` tables.
    pub async fn from_config(config: &AppConfig) -> ServiceResult<Self> {
        let builder = ServiceContextBuilder::new()
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
            .settings(config.reactions.clone());

        let builder = match config.storage.backend {
            StorageBackend::Memory => builder
                .reaction_repo(Arc::new(MemoryReactionRepository::new()))
                .message_directory(Arc::new(MemoryDirectory::permissive()))
                .user_directory(Arc::new(MemoryDirectory::permissive())),
            StorageBackend::Postgres => {
                let database = config
                    .storage
                    .database
                    .as_ref()
                    .ok_or(ConfigError::MissingVar("DATABASE_URL"))
                    .map_err(reaction_common::AppError::from)?;

                let pool = reaction_db::connect(database)
                    .await
                    .map_err(|e| ServiceError::internal(format!("database connection failed: {e}")))?;
                reaction_db::ensure_schema(&pool)
                    .await
                    .map_err(|e| ServiceError::internal(format!("schema bootstrap failed: {e}")))?;

                builder
                    .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
                    .message_directory(Arc::new(PgMessageDirectory::new(pool.clone())))
                    .user_directory(Arc::new(PgUserDirectory::new(pool)))
            }
        };

        let ctx = builder.build()?;
        info!(
            backend = ?config.storage.backend,
            aggregation = ?ctx.settings.aggregation,
            "Service context ready"
        );
        Ok(ctx)
    }

    // === Repositories ===

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Directories ===

    /// Get the message directory
    pub fn message_directory(&self) -> &dyn MessageDirectory {
        self.message_directory.as_ref()
    }

    /// Get the user directory
    pub fn user_directory(&self) -> &dyn UserDirectory {
        self.user_directory.as_ref()
    }

    // === Aggregation ===

    /// Get the shared reaction aggregator
    pub fn aggregator(&self) -> &ReactionAggregator {
        self.aggregator.as_ref()
    }

    // === Settings ===

    /// Get the reaction settings
    pub fn settings(&self) -> &ReactionConfig {
        &self.settings
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("aggregator", &self.aggregator)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    message_directory: Option<Arc<dyn MessageDirectory>>,
    user_directory: Option<Arc<dyn UserDirectory>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    settings: ReactionConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            reaction_repo: None,
            message_directory: None,
            user_directory: None,
            snowflake_generator: None,
            settings: ReactionConfig::default(),
        }
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn message_directory(mut self, directory: Arc<dyn MessageDirectory>) -> Self {
        self.message_directory = Some(directory);
        self
    }

    pub fn user_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.user_directory = Some(directory);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Reaction settings; defaults to incremental aggregation
    pub fn settings(mut self, settings: ReactionConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.message_directory
                .ok_or_else(|| ServiceError::validation("message_directory is required"))?,
            self.user_directory
                .ok_or_else(|| ServiceError::validation("user_directory is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            self.settings,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
