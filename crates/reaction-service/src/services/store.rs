//! Reaction store
//!
//! Owns the per-`(message, user)` reaction state on top of the repository
//! port. Writes made here bypass the aggregator; callers that need counts to
//! follow should go through [`ReactionService`](super::ReactionService).

use tracing::{debug, info, instrument};

use reaction_core::entities::{Reaction, ReactionChange, ReactionCounts, ReactionType};
use reaction_core::error::DomainError;
use reaction_core::traits::ReactionStream;
use reaction_core::value_objects::Snowflake;
use reaction_common::config::MAX_LIST_LIMIT;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction store
pub struct ReactionStore<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionStore<'a> {
    /// Create a new ReactionStore
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Set the user's reaction on a message
    ///
    /// Inserts a new reaction, switches the type of an existing one in
    /// place, or leaves a same-type reaction untouched.
    #[instrument(skip(self))]
    pub async fn apply(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        reaction_type: ReactionType,
    ) -> ServiceResult<ReactionChange> {
        self.verify_participants(message_id, user_id).await?;

        let candidate = Reaction::new(self.ctx.generate_id(), message_id, user_id, reaction_type);
        let change = self.ctx.reaction_repo().upsert(&candidate).await?;

        match change.previous {
            None => info!(
                message_id = %message_id,
                user_id = %user_id,
                reaction_type = %reaction_type,
                "Reaction added"
            ),
            Some(previous) if previous != reaction_type => info!(
                message_id = %message_id,
                user_id = %user_id,
                from = %previous,
                to = %reaction_type,
                "Reaction changed"
            ),
            Some(_) => debug!(message_id = %message_id, user_id = %user_id, "Reaction unchanged"),
        }

        Ok(change)
    }

    /// Like [`apply`](Self::apply), parsing the type name first
    ///
    /// Unknown names are rejected before any state is read.
    pub async fn apply_raw(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        raw_type: &str,
    ) -> ServiceResult<ReactionChange> {
        let reaction_type = ReactionType::parse(raw_type)?;
        self.apply(message_id, user_id, reaction_type).await
    }

    /// Remove the user's reaction, if any
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ReactionChange> {
        let change = self.ctx.reaction_repo().delete(message_id, user_id).await?;

        if let Some(previous) = change.previous {
            info!(
                message_id = %message_id,
                user_id = %user_id,
                reaction_type = %previous,
                "Reaction removed"
            );
        }

        Ok(change)
    }

    /// The user's active reaction on a message
    pub async fn get(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Option<Reaction>> {
        Ok(self.ctx.reaction_repo().find(message_id, user_id).await?)
    }

    /// Lazily stream every active reaction on a message
    pub fn list_by_message(&self, message_id: Snowflake) -> ReactionStream<'a> {
        self.ctx.reaction_repo().stream_by_message(message_id)
    }

    /// Users who reacted with `reaction_type`, oldest first
    ///
    /// `limit` falls back to the configured page size and is capped at 100.
    #[instrument(skip(self))]
    pub async fn users_by_type(
        &self,
        message_id: Snowflake,
        reaction_type: ReactionType,
        limit: Option<u32>,
    ) -> ServiceResult<Vec<Snowflake>> {
        let limit = limit
            .unwrap_or(self.ctx.settings().list_limit)
            .clamp(1, MAX_LIST_LIMIT);

        Ok(self
            .ctx
            .reaction_repo()
            .find_users_by_type(message_id, reaction_type, i64::from(limit))
            .await?)
    }

    /// Delete every reaction on a message, returning what was removed
    #[instrument(skip(self))]
    pub async fn clear_message(&self, message_id: Snowflake) -> ServiceResult<ReactionCounts> {
        let removed = self.ctx.reaction_repo().delete_all(message_id).await?;

        info!(
            message_id = %message_id,
            likes = removed.likes,
            dislikes = removed.dislikes,
            "Reactions cleared"
        );

        Ok(removed)
    }

    async fn verify_participants(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        let (message_exists, user_exists) = tokio::try_join!(
            self.ctx.message_directory().message_exists(message_id),
            self.ctx.user_directory().user_exists(user_id),
        )?;

        if !message_exists {
            return Err(DomainError::MessageNotFound(message_id).into());
        }
        if !user_exists {
            return Err(DomainError::UserNotFound(user_id).into());
        }

        Ok(())
    }
}
