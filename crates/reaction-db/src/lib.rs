//! # reaction-db
//!
//! Storage layer implementing the reaction-core ports.
//!
//! ## Overview
//!
//! - PostgreSQL via SQLx: connection pool, schema bootstrap, row models,
//!   entity mappers, and the `Pg*` repositories
//! - An in-memory backend (`Memory*`) with the same per-pair atomicity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reaction_db::{connect, ensure_schema, PgReactionRepository};
//! use reaction_core::traits::ReactionRepository;
//!
//! async fn example(config: &reaction_common::DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = connect(config).await?;
//!     ensure_schema(&pool).await?;
//!     let reactions = PgReactionRepository::new(pool);
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryDirectory, MemoryReactionRepository};
pub use pool::{connect, create_pool, ensure_schema, PgPool, PoolSettings};
pub use repositories::{PgMessageDirectory, PgReactionRepository, PgUserDirectory};
