//! Reactions table DDL

use sqlx::PgPool;
use tracing::instrument;

/// Idempotent DDL for the reactions table
pub const REACTIONS_SCHEMA: &str = include_str!("../../migrations/0001_create_reactions.sql");

/// Create the reactions table and its indexes if missing
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(REACTIONS_SCHEMA).execute(pool).await?;
    Ok(())
}
