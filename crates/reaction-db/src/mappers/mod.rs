//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: decode database rows into domain objects
//! - `*Insert` structs: prepare entity data for database writes

mod reaction;

pub use reaction::{counts_from_rows, ReactionInsert};
