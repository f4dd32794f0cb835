//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; storage backends and the
//! collaborating identity/message subsystems provide the implementations.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::entities::{Reaction, ReactionChange, ReactionCounts, ReactionType};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Lazy stream of reactions. Calling the producing method again restarts it.
pub type ReactionStream<'a> = BoxStream<'a, RepoResult<Reaction>>;

// ============================================================================
// Reaction Repository
// ============================================================================

/// Durable `(message_id, user_id) -> reaction` mapping
///
/// Implementations serialize writes per `(message_id, user_id)` so the
/// returned [`ReactionChange`] always describes the transition that really
/// happened.
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find the active reaction of a user on a message
    async fn find(&self, message_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Reaction>>;

    /// Stream all active reactions on a message, in no particular order
    fn stream_by_message(&self, message_id: Snowflake) -> ReactionStream<'_>;

    /// Insert `candidate`, or switch the existing reaction to its type
    ///
    /// `candidate.id` is only used when the slot is empty. Re-submitting the
    /// type already held changes nothing.
    async fn upsert(&self, candidate: &Reaction) -> RepoResult<ReactionChange>;

    /// Remove the user's reaction, if any
    async fn delete(&self, message_id: Snowflake, user_id: Snowflake) -> RepoResult<ReactionChange>;

    /// Remove every reaction on a message, returning what was removed
    async fn delete_all(&self, message_id: Snowflake) -> RepoResult<ReactionCounts>;

    /// Count active reactions by type
    async fn count_by_type(&self, message_id: Snowflake) -> RepoResult<ReactionCounts>;

    /// Get users who reacted with a specific type
    async fn find_users_by_type(
        &self,
        message_id: Snowflake,
        reaction_type: ReactionType,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Collaborator ports
// ============================================================================

/// Message subsystem: answers whether a message exists and accepts reactions
#[async_trait]
pub trait MessageDirectory: Send + Sync {
    async fn message_exists(&self, message_id: Snowflake) -> RepoResult<bool>;
}

/// Identity subsystem: answers whether a user exists
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, user_id: Snowflake) -> RepoResult<bool>;
}
