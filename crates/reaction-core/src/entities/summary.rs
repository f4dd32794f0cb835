//! Aggregated reaction counts and per-viewer summaries

use crate::entities::ReactionType;
use crate::value_objects::Snowflake;

/// Signed per-type count change produced by one write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReactionDelta {
    pub likes: i64,
    pub dislikes: i64,
}

impl ReactionDelta {
    /// Delta of zero
    pub const ZERO: Self = Self { likes: 0, dislikes: 0 };

    /// Delta for a transition between two optional states
    pub fn between(previous: Option<ReactionType>, current: Option<ReactionType>) -> Self {
        let mut delta = Self::ZERO;
        if previous == current {
            return delta;
        }
        if let Some(old) = previous {
            *delta.slot(old) -= 1;
        }
        if let Some(new) = current {
            *delta.slot(new) += 1;
        }
        delta
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Change for a single type
    pub fn for_type(&self, reaction_type: ReactionType) -> i64 {
        match reaction_type {
            ReactionType::Like => self.likes,
            ReactionType::Dislike => self.dislikes,
        }
    }

    fn slot(&mut self, reaction_type: ReactionType) -> &mut i64 {
        match reaction_type {
            ReactionType::Like => &mut self.likes,
            ReactionType::Dislike => &mut self.dislikes,
        }
    }
}

/// Anything that moves the per-message tallies
pub trait CountsDelta {
    fn delta(&self) -> ReactionDelta;
}

impl CountsDelta for ReactionDelta {
    fn delta(&self) -> ReactionDelta {
        *self
    }
}

/// Tally of active reactions on a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReactionCounts {
    pub likes: i64,
    pub dislikes: i64,
}

impl ReactionCounts {
    pub fn new(likes: i64, dislikes: i64) -> Self {
        Self { likes, dislikes }
    }

    /// Count a sequence of reaction types
    pub fn tally<I>(types: I) -> Self
    where
        I: IntoIterator<Item = ReactionType>,
    {
        types.into_iter().fold(Self::default(), |mut counts, kind| {
            counts.add(ReactionDelta::between(None, Some(kind)));
            counts
        })
    }

    /// Add a signed delta
    pub fn add(&mut self, delta: ReactionDelta) {
        self.likes += delta.likes;
        self.dislikes += delta.dislikes;
    }

    pub fn total(&self) -> i64 {
        self.likes + self.dislikes
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn is_negative(&self) -> bool {
        self.likes < 0 || self.dislikes < 0
    }

    /// Delta that removes this whole tally
    pub fn negated(&self) -> ReactionDelta {
        ReactionDelta {
            likes: -self.likes,
            dislikes: -self.dislikes,
        }
    }
}

/// A cleared message removes its whole tally
impl CountsDelta for ReactionCounts {
    fn delta(&self) -> ReactionDelta {
        self.negated()
    }
}

/// Summary of a message's reactions as seen by one viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSummary {
    pub message_id: Snowflake,
    pub like_count: u64,
    pub dislike_count: u64,
    pub user_reaction: Option<ReactionType>,
}

impl ReactionSummary {
    /// Build from a tally. Negative counts are floored at zero.
    pub fn new(
        message_id: Snowflake,
        counts: ReactionCounts,
        user_reaction: Option<ReactionType>,
    ) -> Self {
        Self {
            message_id,
            like_count: u64::try_from(counts.likes).unwrap_or(0),
            dislike_count: u64::try_from(counts.dislikes).unwrap_or(0),
            user_reaction,
        }
    }

    /// Summary of a message nobody reacted to
    pub fn empty(message_id: Snowflake) -> Self {
        Self::new(message_id, ReactionCounts::default(), None)
    }
}
