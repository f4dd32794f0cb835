//! Domain entities - reactions and their derived tallies

mod change;
mod reaction;
mod summary;

pub use change::ReactionChange;
pub use reaction::{Reaction, ReactionType};
pub use summary::{CountsDelta, ReactionCounts, ReactionDelta, ReactionSummary};
