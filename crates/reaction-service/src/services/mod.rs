//! Business logic services
//!
//! The reaction store, the aggregator that turns stored reactions into
//! per-message summaries, and the facade the API layer calls.

pub mod aggregator;
pub mod context;
pub mod error;
pub mod reaction;
pub mod store;

// Re-export all services for convenience
pub use aggregator::ReactionAggregator;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use reaction::ReactionService;
pub use store::ReactionStore;
