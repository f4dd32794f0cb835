//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use std::sync::OnceLock;

use serde::Deserialize;

use reaction_core::{Snowflake, SnowflakeGenerator};

/// Worker id reserved for test data
const FIXTURE_WORKER_ID: u16 = 1001;

/// Get a fresh id, unique across tests and test runs
pub fn unique_id() -> Snowflake {
    static GENERATOR: OnceLock<SnowflakeGenerator> = OnceLock::new();
    GENERATOR
        .get_or_init(|| SnowflakeGenerator::new(FIXTURE_WORKER_ID))
        .generate()
}

/// A message and the users who will react to it
#[derive(Debug, Clone)]
pub struct ReactionScenario {
    pub message_id: Snowflake,
    pub users: Vec<Snowflake>,
}

impl ReactionScenario {
    pub fn with_users(count: usize) -> Self {
        Self {
            message_id: unique_id(),
            users: (0..count).map(|_| unique_id()).collect(),
        }
    }

    /// Every id in the scenario, for registering with a directory
    pub fn ids(&self) -> impl Iterator<Item = Snowflake> + '_ {
        std::iter::once(self.message_id).chain(self.users.iter().copied())
    }

    pub fn user(&self, index: usize) -> Snowflake {
        self.users[index]
    }
}

/// Reaction response as seen by an API client
#[derive(Debug, Deserialize)]
pub struct ReactionJson {
    pub id: String,
    pub message_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub reaction_type: String,
    pub created_at: String,
}

/// Summary response as seen by an API client
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct SummaryJson {
    pub message_id: String,
    pub like_count: u64,
    pub dislike_count: u64,
    #[serde(default)]
    pub user_reaction: Option<String>,
}
