//! CLI subcommands.

pub mod browse;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Environment variable holding the catalog connection string.
pub const DATABASE_URL_VAR: &str = "JIRAIBRARY_DATABASE_URL";

/// Error for a required environment variable that is not set.
#[derive(Debug, thiserror::Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVar(pub &'static str);

/// Read the catalog database URL, falling back to `DATABASE_URL`.
///
/// # Errors
///
/// Returns `MissingEnvVar` if neither variable is set.
pub fn database_url() -> Result<SecretString, MissingEnvVar> {
    dotenvy::dotenv().ok();

    std::env::var(DATABASE_URL_VAR)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.trim().is_empty())
        .map(SecretString::from)
        .ok_or(MissingEnvVar(DATABASE_URL_VAR))
}
