//! Run one browse query from the command line.
//!
//! Uses the same configuration as the API server, so
//! `PREFERRED_CURRENCY_CODE`, `JIRAIBRARY_DEFAULT_LIMIT` and
//! `JIRAIBRARY_FACET_COUNTS` apply. `--fixture` overrides the configured
//! catalog source.

use std::path::Path;

use jiraibrary_api::config::ApiConfig;
use jiraibrary_api::state::AppState;
use jiraibrary_facets::QueryParams;

/// Browse with `query` and print the response as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the backend cannot be
/// reached, or the browse fails.
pub async fn run(query: &str, fixture: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let fixture = fixture.map(|path| path.display().to_string());
    let config = ApiConfig::from_lookup(|key| match (key, &fixture) {
        ("JIRAIBRARY_FIXTURE", Some(path)) => Some(path.clone()),
        ("JIRAIBRARY_DATABASE_URL" | "DATABASE_URL", Some(_)) => None,
        // The response cache is pointless for a single query
        ("JIRAIBRARY_BROWSE_CACHE_TTL_SECS", _) => Some("0".to_string()),
        _ => std::env::var(key).ok(),
    })?;

    let state = AppState::connect(&config).await?;
    let response = state
        .catalog()
        .browse(&QueryParams::parse(query.trim_start_matches('?')))
        .await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(response.as_ref())?);
    }

    Ok(())
}
