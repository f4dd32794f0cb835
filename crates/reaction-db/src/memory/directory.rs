//! In-memory stand-in for the message and user subsystems

use async_trait::async_trait;
use dashmap::DashSet;

use reaction_core::traits::{MessageDirectory, RepoResult, UserDirectory};
use reaction_core::value_objects::Snowflake;

/// Registry of known ids
///
/// A permissive directory recognises every id; a strict one only the ids
/// that were registered.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    permissive: bool,
    known: DashSet<Snowflake>,
}

impl MemoryDirectory {
    /// Strict directory with no ids registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that recognises every id
    pub fn permissive() -> Self {
        Self {
            permissive: true,
            known: DashSet::new(),
        }
    }

    /// Strict directory pre-populated with `ids`
    pub fn with_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let directory = Self::new();
        for id in ids {
            directory.register(id);
        }
        directory
    }

    pub fn register(&self, id: Snowflake) {
        self.known.insert(id);
    }

    pub fn unregister(&self, id: Snowflake) -> bool {
        self.known.remove(&id).is_some()
    }

    pub fn contains(&self, id: Snowflake) -> bool {
        self.permissive || self.known.contains(&id)
    }
}

#[async_trait]
impl MessageDirectory for MemoryDirectory {
    async fn message_exists(&self, message_id: Snowflake) -> RepoResult<bool> {
        Ok(self.contains(message_id))
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn user_exists(&self, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.contains(user_id))
    }
}
