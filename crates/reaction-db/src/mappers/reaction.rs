//! Reaction entity <-> model mapper

use reaction_core::entities::{Reaction, ReactionCounts, ReactionDelta, ReactionType};
use reaction_core::error::DomainError;
use reaction_core::value_objects::Snowflake;

use crate::models::{ReactionCountModel, ReactionModel};

/// Decode a reactions row; an unknown type code is rejected
impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        Ok(Reaction {
            id: Snowflake::new(model.id),
            message_id: Snowflake::new(model.message_id),
            user_id: Snowflake::new(model.user_id),
            reaction_type: ReactionType::from_code(model.reaction_type)?,
            created_at: model.created_at,
        })
    }
}

/// Column values for inserting or updating a reaction
pub struct ReactionInsert {
    pub id: i64,
    pub message_id: i64,
    pub user_id: i64,
    pub reaction_type: i16,
}

impl ReactionInsert {
    pub fn new(reaction: &Reaction) -> Self {
        Self {
            id: reaction.id.into_inner(),
            message_id: reaction.message_id.into_inner(),
            user_id: reaction.user_id.into_inner(),
            reaction_type: reaction.reaction_type.code(),
        }
    }
}

/// Fold GROUP BY rows into a tally
pub fn counts_from_rows(rows: Vec<ReactionCountModel>) -> Result<ReactionCounts, DomainError> {
    let mut counts = ReactionCounts::default();
    for row in rows {
        let kind = ReactionType::from_code(row.reaction_type)?;
        let mut delta = ReactionDelta::ZERO;
        match kind {
            ReactionType::Like => delta.likes = row.count,
            ReactionType::Dislike => delta.dislikes = row.count,
        }
        counts.add(delta);
    }
    Ok(counts)
}
