//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub id: i64,
    pub message_id: i64,
    pub user_id: i64,
    pub reaction_type: i16,
    pub created_at: DateTime<Utc>,
}

/// Per-type reaction count (from a GROUP BY query)
#[derive(Debug, Clone, FromRow)]
pub struct ReactionCountModel {
    pub reaction_type: i16,
    pub count: i64,
}
