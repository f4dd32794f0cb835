//! Reaction entity - one user's LIKE/DISLIKE on a message

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Closed set of reaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionType {
    Like,
    Dislike,
}

impl ReactionType {
    /// Every variant, in storage-code order
    pub const ALL: [ReactionType; 2] = [ReactionType::Like, ReactionType::Dislike];

    /// Wire name (`LIKE` / `DISLIKE`)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Dislike => "DISLIKE",
        }
    }

    /// Storage code used by the `reactions.reaction_type` column
    pub const fn code(self) -> i16 {
        match self {
            Self::Like => 1,
            Self::Dislike => 2,
        }
    }

    /// Decode a storage code
    pub fn from_code(code: i16) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Self::Like),
            2 => Ok(Self::Dislike),
            other => Err(DomainError::InvalidReactionType(other.to_string())),
        }
    }

    /// Parse a wire name. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("LIKE") {
            Ok(Self::Like)
        } else if trimmed.eq_ignore_ascii_case("DISLIKE") {
            Ok(Self::Dislike)
        } else {
            Err(DomainError::InvalidReactionType(raw.to_string()))
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<i16> for ReactionType {
    type Error = DomainError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

/// Reaction entity
///
/// At most one exists per `(message_id, user_id)`. Changing the type keeps
/// the `id` and refreshes `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction stamped with the current time
    pub fn new(
        id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        reaction_type: ReactionType,
    ) -> Self {
        Self {
            id,
            message_id,
            user_id,
            reaction_type,
            created_at: Utc::now(),
        }
    }

    /// Check if reaction has a specific type
    #[inline]
    pub fn is_type(&self, reaction_type: ReactionType) -> bool {
        self.reaction_type == reaction_type
    }

    /// Same reaction, switched to another type
    pub fn retyped(&self, reaction_type: ReactionType, at: DateTime<Utc>) -> Self {
        Self {
            reaction_type,
            created_at: at,
            ..self.clone()
        }
    }
}
