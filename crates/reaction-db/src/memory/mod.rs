//! Process-local backend, used when no database is configured and in tests

mod directory;
mod reaction;

pub use directory::MemoryDirectory;
pub use reaction::MemoryReactionRepository;
