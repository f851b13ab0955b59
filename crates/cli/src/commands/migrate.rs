//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! jb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `JIRAIBRARY_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migrations live in `crates/api/migrations/`.

use jiraibrary_api::db;
use tracing::info;

use super::MissingEnvVar;

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVar),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run catalog database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration cannot be applied.
pub async fn catalog() -> Result<(), MigrationError> {
    let database_url = super::database_url()?;

    info!("Connecting to catalog database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running catalog migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    info!("Catalog migrations complete!");
    Ok(())
}
