//! In-memory implementation of ReactionRepository
//!
//! Reactions live in a two-level map: message -> (user -> reaction). The
//! inner map's `entry` API holds the shard write lock for the whole
//! read-modify-write, which makes every write atomic per
//! `(message_id, user_id)` while users on the same message mostly hit
//! different shards.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use tracing::instrument;

use reaction_core::entities::{Reaction, ReactionChange, ReactionCounts, ReactionType};
use reaction_core::traits::{ReactionRepository, ReactionStream, RepoResult};
use reaction_core::value_objects::Snowflake;

type Slots = DashMap<Snowflake, Reaction>;

/// Process-local reaction storage
#[derive(Default)]
pub struct MemoryReactionRepository {
    messages: DashMap<Snowflake, Arc<Slots>>,
}

impl MemoryReactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots for a message, created on first write
    fn slots(&self, message_id: Snowflake) -> Arc<Slots> {
        Arc::clone(self.messages.entry(message_id).or_default().value())
    }

    fn existing_slots(&self, message_id: Snowflake) -> Option<Arc<Slots>> {
        self.messages
            .get(&message_id)
            .map(|slots| Arc::clone(slots.value()))
    }

    fn snapshot(&self, message_id: Snowflake) -> Vec<Reaction> {
        self.existing_slots(message_id)
            .map(|slots| slots.iter().map(|r| r.value().clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReactionRepository for MemoryReactionRepository {
    #[instrument(skip(self))]
    async fn find(&self, message_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Reaction>> {
        Ok(self
            .existing_slots(message_id)
            .and_then(|slots| slots.get(&user_id).map(|r| r.value().clone())))
    }

    /// Each call takes a fresh snapshot of the message's reactions
    fn stream_by_message(&self, message_id: Snowflake) -> ReactionStream<'_> {
        stream::iter(self.snapshot(message_id).into_iter().map(Ok)).boxed()
    }

    #[instrument(skip(self, candidate), fields(message_id = %candidate.message_id, user_id = %candidate.user_id))]
    async fn upsert(&self, candidate: &Reaction) -> RepoResult<ReactionChange> {
        let slots = self.slots(candidate.message_id);

        let change = match slots.entry(candidate.user_id) {
            Entry::Occupied(mut entry) => {
                let previous = entry.get().reaction_type;
                if previous != candidate.reaction_type {
                    let updated = entry
                        .get()
                        .retyped(candidate.reaction_type, candidate.created_at);
                    entry.insert(updated);
                }
                ReactionChange::replaced(previous, entry.get().clone())
            }
            Entry::Vacant(entry) => {
                entry.insert(candidate.clone());
                ReactionChange::created(candidate.clone())
            }
        };

        Ok(change)
    }

    #[instrument(skip(self))]
    async fn delete(&self, message_id: Snowflake, user_id: Snowflake) -> RepoResult<ReactionChange> {
        let previous = self
            .existing_slots(message_id)
            .and_then(|slots| slots.remove(&user_id))
            .map(|(_, reaction)| reaction.reaction_type);

        Ok(ReactionChange::removed(message_id, user_id, previous))
    }

    #[instrument(skip(self))]
    async fn delete_all(&self, message_id: Snowflake) -> RepoResult<ReactionCounts> {
        let Some(slots) = self.existing_slots(message_id) else {
            return Ok(ReactionCounts::default());
        };

        // Shard by shard; a write racing the clear either lands before its
        // shard is visited (and is removed) or after (and survives)
        let mut removed = Vec::new();
        slots.retain(|_, reaction| {
            removed.push(reaction.reaction_type);
            false
        });

        Ok(ReactionCounts::tally(removed))
    }

    #[instrument(skip(self))]
    async fn count_by_type(&self, message_id: Snowflake) -> RepoResult<ReactionCounts> {
        Ok(self
            .existing_slots(message_id)
            .map(|slots| ReactionCounts::tally(slots.iter().map(|r| r.value().reaction_type)))
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn find_users_by_type(
        &self,
        message_id: Snowflake,
        reaction_type: ReactionType,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        let limit = usize::try_from(limit.clamp(1, 100)).unwrap_or(100);

        let mut matching: Vec<Reaction> = self
            .snapshot(message_id)
            .into_iter()
            .filter(|r| r.is_type(reaction_type))
            .collect();
        matching.sort_by_key(|r| (r.created_at, r.user_id));

        Ok(matching.into_iter().take(limit).map(|r| r.user_id).collect())
    }
}
