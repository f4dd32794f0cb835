//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use reaction_core::entities::{Reaction, ReactionSummary};

use super::responses::{ReactionResponse, ReactionSummaryResponse};

// ============================================================================
// Reaction Mappers
// ============================================================================

impl From<&Reaction> for ReactionResponse {
    fn from(reaction: &Reaction) -> Self {
        Self {
            id: reaction.id.to_string(),
            message_id: reaction.message_id.to_string(),
            user_id: reaction.user_id.to_string(),
            reaction_type: reaction.reaction_type,
            created_at: reaction.created_at,
        }
    }
}

impl From<Reaction> for ReactionResponse {
    fn from(reaction: Reaction) -> Self {
        Self::from(&reaction)
    }
}

impl From<ReactionSummary> for ReactionSummaryResponse {
    fn from(summary: ReactionSummary) -> Self {
        Self {
            message_id: summary.message_id.to_string(),
            like_count: summary.like_count,
            dislike_count: summary.dislike_count,
            user_reaction: summary.user_reaction,
        }
    }
}
