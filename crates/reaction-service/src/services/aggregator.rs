//! Reaction aggregation
//!
//! Produces per-message summaries either by counting from storage on every
//! call or from counters kept current by the writes that pass through
//! [`ReactionAggregator::track`].
//!
//! Incremental counters are seeded lazily from `count_by_type`. Each message
//! has a gate: writes hold it shared for the duration of the storage call
//! and the counter update, seeding holds it exclusively. A seed therefore
//! never observes a write whose delta has not been applied yet.
//!
//! Only seeded messages keep an entry in the tally map. A write to an
//! unseeded message, or an invalidation, drops the entry again once no
//! other caller holds it.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use reaction_common::AggregationStrategy;
use reaction_core::entities::{CountsDelta, ReactionCounts, ReactionDelta, ReactionSummary};
use reaction_core::traits::{ReactionRepository, RepoResult};
use reaction_core::value_objects::Snowflake;

/// Counter state for one message
#[derive(Default)]
struct MessageTally {
    gate: RwLock<()>,
    /// `None` until seeded, and again after invalidation
    counts: Mutex<Option<ReactionCounts>>,
}

impl MessageTally {
    fn snapshot(&self) -> Option<ReactionCounts> {
        *self.counts.lock()
    }

    fn apply(&self, delta: ReactionDelta) {
        if delta.is_zero() {
            return;
        }
        // Unseeded counters pick the write up when they are seeded
        if let Some(counts) = self.counts.lock().as_mut() {
            counts.add(delta);
        }
    }
}

/// Computes reaction summaries for messages
pub struct ReactionAggregator {
    repo: Arc<dyn ReactionRepository>,
    strategy: AggregationStrategy,
    tallies: DashMap<Snowflake, Arc<MessageTally>>,
}

impl ReactionAggregator {
    pub fn new(repo: Arc<dyn ReactionRepository>, strategy: AggregationStrategy) -> Self {
        Self {
            repo,
            strategy,
            tallies: DashMap::new(),
        }
    }

    pub fn strategy(&self) -> AggregationStrategy {
        self.strategy
    }

    /// Number of messages with a live tally entry
    pub fn tracked_messages(&self) -> usize {
        self.tallies.len()
    }

    fn tally(&self, message_id: Snowflake) -> Arc<MessageTally> {
        Arc::clone(self.tallies.entry(message_id).or_default().value())
    }

    /// Drop the entry of an unseeded message once `tally` was its last user
    ///
    /// Handles are only cloned out of the map under its shard lock, so a
    /// strong count of one inside `remove_if` means nobody else holds it.
    fn release(&self, message_id: Snowflake, tally: Arc<MessageTally>) {
        if tally.snapshot().is_some() {
            return;
        }
        drop(tally);
        self.tallies.remove_if(&message_id, |_, tally| {
            Arc::strong_count(tally) == 1 && tally.snapshot().is_none()
        });
    }

    /// Run a write against storage and fold its delta into the counters
    ///
    /// The write future must only touch reactions of `message_id`.
    pub async fn track<T, E, F>(&self, message_id: Snowflake, write: F) -> Result<T, E>
    where
        T: CountsDelta,
        F: Future<Output = Result<T, E>>,
    {
        if self.strategy == AggregationStrategy::Recompute {
            return write.await;
        }

        let tally = self.tally(message_id);
        let outcome = {
            let _write = tally.gate.read().await;
            let outcome = write.await;
            if let Ok(outcome) = &outcome {
                tally.apply(outcome.delta());
            }
            outcome
        };
        self.release(message_id, tally);
        outcome
    }

    /// Forget the cached counters for a message; the next summary reseeds
    #[instrument(skip(self))]
    pub async fn invalidate(&self, message_id: Snowflake) {
        let Some(tally) = self.tallies.get(&message_id).map(|t| Arc::clone(t.value())) else {
            return;
        };
        {
            let _seed = tally.gate.write().await;
            *tally.counts.lock() = None;
        }
        self.release(message_id, tally);
        debug!("Reaction counters invalidated");
    }

    /// Current like/dislike tally for a message
    #[instrument(skip(self))]
    pub async fn counts(&self, message_id: Snowflake) -> RepoResult<ReactionCounts> {
        let counts = match self.strategy {
            AggregationStrategy::Recompute => self.repo.count_by_type(message_id).await?,
            AggregationStrategy::Incremental => self.seeded_counts(message_id).await?,
        };

        if counts.is_negative() {
            warn!(
                likes = counts.likes,
                dislikes = counts.dislikes,
                "Negative reaction count observed, clamping to zero"
            );
        }

        Ok(counts)
    }

    async fn seeded_counts(&self, message_id: Snowflake) -> RepoResult<ReactionCounts> {
        let tally = self.tally(message_id);
        if let Some(counts) = tally.snapshot() {
            return Ok(counts);
        }

        let seed = tally.gate.write().await;
        // Another caller may have seeded while we waited
        if let Some(counts) = tally.snapshot() {
            return Ok(counts);
        }

        let counts = match self.repo.count_by_type(message_id).await {
            Ok(counts) => counts,
            Err(e) => {
                drop(seed);
                self.release(message_id, tally);
                return Err(e);
            }
        };
        *tally.counts.lock() = Some(counts);
        debug!(likes = counts.likes, dislikes = counts.dislikes, "Reaction counters seeded");
        Ok(counts)
    }

    /// Like/dislike counts plus the viewer's own reaction
    #[instrument(skip(self))]
    pub async fn summarize(
        &self,
        message_id: Snowflake,
        viewer_id: Snowflake,
    ) -> RepoResult<ReactionSummary> {
        let counts = self.counts(message_id).await?;
        let user_reaction = self
            .repo
            .find(message_id, viewer_id)
            .await?
            .map(|reaction| reaction.reaction_type);

        Ok(ReactionSummary::new(message_id, counts, user_reaction))
    }
}

impl std::fmt::Debug for ReactionAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactionAggregator")
            .field("strategy", &self.strategy)
            .field("tracked_messages", &self.tracked_messages())
            .finish()
    }
}
