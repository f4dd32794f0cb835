//! Database connection pool management

mod postgres;
mod schema;

pub use postgres::{connect, create_pool, PoolSettings};
pub use schema::{ensure_schema, REACTIONS_SCHEMA};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
