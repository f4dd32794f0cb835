//! Reaction service
//!
//! Entry point for the API layer: routes writes through the store and keeps
//! the aggregator's counters in step with them.

use tracing::instrument;
use validator::Validate;

use reaction_core::entities::{ReactionChange, ReactionCounts, ReactionSummary, ReactionType};
use reaction_core::Snowflake;

use crate::dto::{
    ListReactorsQuery, ReactionResponse, ReactionSummaryResponse, ReactorsResponse,
    SubmitReactionRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::store::ReactionStore;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn store(&self) -> ReactionStore<'a> {
        ReactionStore::new(self.ctx)
    }

    /// Handle a submit request from the API layer
    #[instrument(skip(self, request))]
    pub async fn submit(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        request: SubmitReactionRequest,
    ) -> ServiceResult<ReactionResponse> {
        request.validate()?;
        let reaction_type = ReactionType::parse(&request.reaction_type)?;

        let change = self.apply(message_id, user_id, reaction_type).await?;
        let reaction = change
            .current
            .ok_or_else(|| ServiceError::internal("reaction missing after apply"))?;

        Ok(ReactionResponse::from(&reaction))
    }

    /// Set the user's reaction and update the message's counters
    pub async fn apply(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        reaction_type: ReactionType,
    ) -> ServiceResult<ReactionChange> {
        let store = self.store();
        self.ctx
            .aggregator()
            .track(message_id, store.apply(message_id, user_id, reaction_type))
            .await
    }

    /// Remove the user's reaction and update the message's counters
    pub async fn remove(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ReactionChange> {
        let store = self.store();
        self.ctx
            .aggregator()
            .track(message_id, store.remove(message_id, user_id))
            .await
    }

    /// Summary of a message as seen by `viewer_id`
    pub async fn summarize(
        &self,
        message_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<ReactionSummary> {
        Ok(self
            .ctx
            .aggregator()
            .summarize(message_id, viewer_id)
            .await?)
    }

    /// Summary of a message as seen by `viewer_id`, ready for the wire
    pub async fn summary(
        &self,
        message_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<ReactionSummaryResponse> {
        let summary = self.summarize(message_id, viewer_id).await?;
        Ok(ReactionSummaryResponse::from(summary))
    }

    /// The user's active reaction on a message
    pub async fn get(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Option<ReactionResponse>> {
        let reaction = self.store().get(message_id, user_id).await?;
        Ok(reaction.as_ref().map(ReactionResponse::from))
    }

    /// Ids of users who reacted with `reaction_type`, oldest first
    pub async fn users_by_type(
        &self,
        message_id: Snowflake,
        reaction_type: ReactionType,
        limit: Option<u32>,
    ) -> ServiceResult<Vec<String>> {
        let users = self
            .store()
            .users_by_type(message_id, reaction_type, limit)
            .await?;
        Ok(users.iter().map(ToString::to_string).collect())
    }

    /// Handle a "who reacted" query from the API layer
    pub async fn list_reactors(
        &self,
        message_id: Snowflake,
        query: ListReactorsQuery,
    ) -> ServiceResult<ReactorsResponse> {
        query.validate()?;
        let reaction_type = ReactionType::parse(&query.reaction_type)?;
        let users = self
            .users_by_type(message_id, reaction_type, query.limit)
            .await?;

        Ok(ReactorsResponse {
            message_id: message_id.to_string(),
            reaction_type,
            users,
        })
    }

    /// Delete every reaction on a message and drop its counters
    pub async fn clear_message(&self, message_id: Snowflake) -> ServiceResult<ReactionCounts> {
        let store = self.store();
        let aggregator = self.ctx.aggregator();
        let removed = aggregator
            .track(message_id, store.clear_message(message_id))
            .await?;
        aggregator.invalidate(message_id).await;
        Ok(removed)
    }
}
