//! Outcome of a single reaction write

use crate::entities::{CountsDelta, Reaction, ReactionDelta, ReactionType};
use crate::value_objects::Snowflake;

/// State transition of one `(message_id, user_id)` slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionChange {
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    /// Type held before the write
    pub previous: Option<ReactionType>,
    /// Reaction held after the write
    pub current: Option<Reaction>,
}

impl ReactionChange {
    /// A first reaction on an empty slot
    pub fn created(reaction: Reaction) -> Self {
        Self {
            message_id: reaction.message_id,
            user_id: reaction.user_id,
            previous: None,
            current: Some(reaction),
        }
    }

    /// Existing reaction replaced (or re-submitted) with `reaction`
    pub fn replaced(previous: ReactionType, reaction: Reaction) -> Self {
        Self {
            message_id: reaction.message_id,
            user_id: reaction.user_id,
            previous: Some(previous),
            current: Some(reaction),
        }
    }

    /// Slot cleared. `previous` is `None` when nothing was there.
    pub fn removed(
        message_id: Snowflake,
        user_id: Snowflake,
        previous: Option<ReactionType>,
    ) -> Self {
        Self {
            message_id,
            user_id,
            previous,
            current: None,
        }
    }

    /// Type active after the write
    pub fn current_type(&self) -> Option<ReactionType> {
        self.current.as_ref().map(|r| r.reaction_type)
    }

    /// True when the write left the slot as it was
    pub fn is_noop(&self) -> bool {
        self.previous == self.current_type()
    }
}

impl CountsDelta for ReactionChange {
    fn delta(&self) -> ReactionDelta {
        ReactionDelta::between(self.previous, self.current_type())
    }
}
