//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Reaction Requests
// ============================================================================

/// Submit (or switch) a reaction on a message
///
/// The type name is only length-checked here; the store parses it into a
/// `ReactionType` and rejects anything that is not `LIKE` or `DISLIKE`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitReactionRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 16, message = "Reaction type must be 1-16 characters"))]
    pub reaction_type: String,
}

impl SubmitReactionRequest {
    pub fn new(reaction_type: impl Into<String>) -> Self {
        Self {
            reaction_type: reaction_type.into(),
        }
    }
}

/// Query for listing who reacted with a given type
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListReactorsQuery {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 16, message = "Reaction type must be 1-16 characters"))]
    pub reaction_type: String,

    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}
