//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use reaction_core::entities::ReactionType;

// ============================================================================
// Reaction Responses
// ============================================================================

/// A single user's reaction
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub id: String,
    pub message_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
}

/// Per-message reaction summary for one viewer
#[derive(Debug, Clone, Serialize)]
pub struct ReactionSummaryResponse {
    pub message_id: String,
    pub like_count: u64,
    pub dislike_count: u64,
    /// The viewer's own reaction, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_reaction: Option<ReactionType>,
}

/// Users who reacted with one type
#[derive(Debug, Clone, Serialize)]
pub struct ReactorsResponse {
    pub message_id: String,
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
    pub users: Vec<String>,
}
