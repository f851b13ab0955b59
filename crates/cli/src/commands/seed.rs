//! Seed the catalog database from a snapshot file.
//!
//! The file is parsed before connecting, so a malformed snapshot never
//! touches the database. Re-running with the same file is idempotent.

use std::path::Path;

use jiraibrary_api::{db, fixture};
use tracing::info;

/// Import a snapshot file.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be read
/// or parsed, or the import fails.
pub async fn snapshot(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    // Read and validate the file before connecting to the database
    let snapshot = fixture::load_snapshot(path).await?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let summary = db::import_snapshot(&pool, &snapshot).await?;

    info!("Seeding complete!");
    info!("  Reference rows: {}", summary.vocabulary);
    info!("  Items: {}", summary.items);

    Ok(())
}
