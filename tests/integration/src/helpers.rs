//! Test helpers for integration tests
//!
//! Provides service contexts wired to the in-memory backend, or to
//! PostgreSQL when `DATABASE_URL` is set.

use std::sync::Arc;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

use reaction_common::{try_init_tracing, AggregationStrategy, AppConfig, ReactionConfig};
use reaction_core::traits::ReactionRepository;
use reaction_core::SnowflakeGenerator;
use reaction_db::{ensure_schema, MemoryDirectory, MemoryReactionRepository, PgPool, PgReactionRepository};
use reaction_service::{ReactionService, ServiceContext, ServiceContextBuilder};

use crate::fixtures::ReactionScenario;

/// Worker id used by service contexts under test
const SERVICE_WORKER_ID: u16 = 1002;

/// Service context plus the directory that decides which ids exist
pub struct TestContext {
    pub ctx: ServiceContext,
    pub directory: Arc<MemoryDirectory>,
}

impl TestContext {
    /// In-memory backend with incremental aggregation
    pub fn start() -> Result<Self> {
        Self::start_with_strategy(AggregationStrategy::Incremental)
    }

    /// In-memory backend with the given aggregation strategy
    pub fn start_with_strategy(aggregation: AggregationStrategy) -> Result<Self> {
        Self::with_repository(Arc::new(MemoryReactionRepository::new()), aggregation)
    }

    /// PostgreSQL backend, or `None` when no database is configured
    pub async fn postgres(aggregation: AggregationStrategy) -> Result<Option<Self>> {
        if !check_test_env().await {
            return Ok(None);
        }

        let config = test_config()?;
        let database = config
            .storage
            .database
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL not set"))?;
        let pool = PgPool::connect(&database.url).await?;
        ensure_schema(&pool).await?;

        Self::with_repository(Arc::new(PgReactionRepository::new(pool)), aggregation).map(Some)
    }

    fn with_repository(
        repo: Arc<dyn ReactionRepository>,
        aggregation: AggregationStrategy,
    ) -> Result<Self> {
        // Several tests share the process; only the first install wins
        try_init_tracing().ok();

        let directory = Arc::new(MemoryDirectory::new());
        let ctx = ServiceContextBuilder::new()
            .reaction_repo(repo)
            .message_directory(directory.clone())
            .user_directory(directory.clone())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(SERVICE_WORKER_ID)))
            .settings(ReactionConfig {
                aggregation,
                ..ReactionConfig::default()
            })
            .build()
            .map_err(|e| anyhow::anyhow!("Context error: {e}"))?;

        Ok(Self { ctx, directory })
    }

    /// Register a scenario's message and users as existing
    pub fn register(&self, scenario: &ReactionScenario) {
        for id in scenario.ids() {
            self.directory.register(id);
        }
    }

    pub fn service(&self) -> ReactionService<'_> {
        ReactionService::new(&self.ctx)
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    // Load from environment or use defaults
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    Ok(config)
}

/// Helper to check if a database is available
pub async fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    true
}

/// Serialize a response DTO and read it back the way a client would
pub fn as_client<S: Serialize, T: DeserializeOwned>(response: &S) -> Result<T> {
    let body = serde_json::to_string(response)?;
    Ok(serde_json::from_str(&body)?)
}
