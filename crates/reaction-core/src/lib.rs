//! # reaction-core
//!
//! Domain layer for message reactions: entities, value objects, repository
//! ports, and domain errors. No infrastructure dependencies.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    CountsDelta, Reaction, ReactionChange, ReactionCounts, ReactionDelta, ReactionSummary,
    ReactionType,
};
pub use error::DomainError;
pub use traits::{MessageDirectory, ReactionRepository, ReactionStream, RepoResult, UserDirectory};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError, MAX_WORKER_ID};
