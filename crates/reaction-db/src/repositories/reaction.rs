//! PostgreSQL implementation of ReactionRepository
//!
//! Writes for one `(message_id, user_id)` are serialized by row locks:
//! `upsert` locks the existing row with `SELECT ... FOR UPDATE`, and an empty
//! slot is claimed with `INSERT ... ON CONFLICT DO NOTHING`, which waits for
//! any concurrent insert of the same pair to settle.

use async_trait::async_trait;
use futures::StreamExt;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument, warn};

use reaction_core::entities::{Reaction, ReactionChange, ReactionCounts, ReactionType};
use reaction_core::error::DomainError;
use reaction_core::traits::{ReactionRepository, ReactionStream, RepoResult};
use reaction_core::value_objects::Snowflake;

use crate::mappers::{counts_from_rows, ReactionInsert};
use crate::models::{ReactionCountModel, ReactionModel};

use super::error::{map_db_error, map_unique_violation};

/// Attempts before a lost insert race is reported as a conflict
pub const MAX_UPSERT_ATTEMPTS: u32 = 3;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One transactional attempt. `Ok(None)` means a concurrent insert
    /// claimed the slot between our lookup and our insert.
    async fn try_upsert(&self, candidate: &Reaction) -> RepoResult<Option<ReactionChange>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let existing = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, message_id, user_id, reaction_type, created_at
            FROM reactions
            WHERE message_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(candidate.message_id.into_inner())
        .bind(candidate.user_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let change = match existing {
            Some(model) => {
                let current = Reaction::try_from(model)?;
                let previous = current.reaction_type;
                if previous == candidate.reaction_type {
                    ReactionChange::replaced(previous, current)
                } else {
                    let updated = current.retyped(candidate.reaction_type, candidate.created_at);
                    Self::update_type(&mut tx, &updated).await?;
                    ReactionChange::replaced(previous, updated)
                }
            }
            None => match Self::insert(&mut tx, candidate).await? {
                Some(created) => ReactionChange::created(created),
                None => {
                    tx.rollback().await.map_err(map_db_error)?;
                    return Ok(None);
                }
            },
        };

        tx.commit().await.map_err(map_db_error)?;
        Ok(Some(change))
    }

    async fn update_type(
        tx: &mut Transaction<'_, Postgres>,
        reaction: &Reaction,
    ) -> RepoResult<()> {
        let values = ReactionInsert::new(reaction);
        sqlx::query(
            r#"
            UPDATE reactions
            SET reaction_type = $3, created_at = $4
            WHERE message_id = $1 AND user_id = $2
            "#,
        )
        .bind(values.message_id)
        .bind(values.user_id)
        .bind(values.reaction_type)
        .bind(reaction.created_at)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        reaction: &Reaction,
    ) -> RepoResult<Option<Reaction>> {
        let values = ReactionInsert::new(reaction);
        let row = sqlx::query_as::<_, ReactionModel>(
            r#"
            INSERT INTO reactions (id, message_id, user_id, reaction_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (message_id, user_id) DO NOTHING
            RETURNING id, message_id, user_id, reaction_type, created_at
            "#,
        )
        .bind(values.id)
        .bind(values.message_id)
        .bind(values.user_id)
        .bind(values.reaction_type)
        .bind(reaction.created_at)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            // Only the id can still collide here
            map_unique_violation(e, || {
                DomainError::InternalError(format!("reaction id {} already in use", reaction.id))
            })
        })?;

        row.map(Reaction::try_from).transpose()
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, message_id, user_id, reaction_type, created_at
            FROM reactions
            WHERE message_id = $1 AND user_id = $2
            "#,
        )
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Reaction::try_from).transpose()
    }

    fn stream_by_message(&self, message_id: Snowflake) -> ReactionStream<'_> {
        sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, message_id, user_id, reaction_type, created_at
            FROM reactions
            WHERE message_id = $1
            "#,
        )
        .bind(message_id.into_inner())
        .fetch(&self.pool)
        .map(|row| row.map_err(map_db_error).and_then(Reaction::try_from))
        .boxed()
    }

    #[instrument(skip(self, candidate), fields(message_id = %candidate.message_id, user_id = %candidate.user_id))]
    async fn upsert(&self, candidate: &Reaction) -> RepoResult<ReactionChange> {
        for attempt in 1..=MAX_UPSERT_ATTEMPTS {
            if let Some(change) = self.try_upsert(candidate).await? {
                return Ok(change);
            }
            warn!(attempt, "Reaction insert lost a race, retrying");
        }

        Err(DomainError::ReactionConflict {
            message_id: candidate.message_id,
            user_id: candidate.user_id,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, message_id: Snowflake, user_id: Snowflake) -> RepoResult<ReactionChange> {
        let previous = sqlx::query_scalar::<_, i16>(
            r#"
            DELETE FROM reactions WHERE message_id = $1 AND user_id = $2
            RETURNING reaction_type
            "#,
        )
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(ReactionType::from_code)
        .transpose()?;

        Ok(ReactionChange::removed(message_id, user_id, previous))
    }

    #[instrument(skip(self))]
    async fn delete_all(&self, message_id: Snowflake) -> RepoResult<ReactionCounts> {
        let removed = sqlx::query_scalar::<_, i16>(
            r#"
            DELETE FROM reactions WHERE message_id = $1
            RETURNING reaction_type
            "#,
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?
        .into_iter()
        .map(ReactionType::from_code)
        .collect::<RepoResult<Vec<_>>>()?;

        debug!(count = removed.len(), "Reactions deleted");
        Ok(ReactionCounts::tally(removed))
    }

    #[instrument(skip(self))]
    async fn count_by_type(&self, message_id: Snowflake) -> RepoResult<ReactionCounts> {
        let rows = sqlx::query_as::<_, ReactionCountModel>(
            r#"
            SELECT reaction_type, COUNT(*) AS count
            FROM reactions
            WHERE message_id = $1
            GROUP BY reaction_type
            "#,
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        counts_from_rows(rows)
    }

    #[instrument(skip(self))]
    async fn find_users_by_type(
        &self,
        message_id: Snowflake,
        reaction_type: ReactionType,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        let limit = limit.clamp(1, 100);

        let results = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id
            FROM reactions
            WHERE message_id = $1 AND reaction_type = $2
            ORDER BY created_at, user_id
            LIMIT $3
            "#,
        )
        .bind(message_id.into_inner())
        .bind(reaction_type.code())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }
}
