//! PostgreSQL-backed existence checks against the message and user tables
//!
//! Both tables belong to other subsystems; only their `id` and `deleted_at`
//! columns are relied on.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use reaction_core::traits::{MessageDirectory, RepoResult, UserDirectory};
use reaction_core::value_objects::Snowflake;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgMessageDirectory {
    pool: PgPool,
}

impl PgMessageDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageDirectory for PgMessageDirectory {
    #[instrument(skip(self))]
    async fn message_exists(&self, message_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM messages WHERE id = $1 AND deleted_at IS NULL)
            "#,
        )
        .bind(message_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    #[instrument(skip(self))]
    async fn user_exists(&self, user_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND deleted_at IS NULL)
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
