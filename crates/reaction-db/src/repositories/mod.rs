//! Repository implementations
//!
//! PostgreSQL implementations of the ports defined in reaction-core.

mod directory;
mod error;
mod reaction;

pub use directory::{PgMessageDirectory, PgUserDirectory};
pub use error::{map_db_error, map_unique_violation};
pub use reaction::{PgReactionRepository, MAX_UPSERT_ATTEMPTS};
