//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (one of)
//! - `JIRAIBRARY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `JIRAIBRARY_FIXTURE` - Path to a YAML catalog snapshot served from memory
//!
//! ## Optional
//! - `JIRAIBRARY_HOST` - Bind address (default: 127.0.0.1)
//! - `JIRAIBRARY_PORT` - Listen port (default: 8000)
//! - `PREFERRED_CURRENCY_CODE` - Currency for price ranges without one (default: USD)
//! - `JIRAIBRARY_DEFAULT_LIMIT` - Page size when `limit` is absent (default: 60, 0 = all)
//! - `JIRAIBRARY_FACET_COUNTS` - `exclude_self` (default) or `global`
//! - `JIRAIBRARY_BROWSE_CACHE_TTL_SECS` - Response cache TTL (default: 30, 0 = disabled)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use jiraibrary_core::CurrencyCode;
use jiraibrary_facets::{DEFAULT_LIMIT, EngineConfig, FacetCountMode};
use secrecy::SecretString;
use thiserror::Error;

const DATABASE_URL_VAR: &str = "JIRAIBRARY_DATABASE_URL";
const FIXTURE_VAR: &str = "JIRAIBRARY_FIXTURE";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the catalog is read from.
#[derive(Clone)]
pub enum CatalogSource {
    /// `PostgreSQL` database (URL contains password).
    Database(SecretString),
    /// YAML snapshot loaded into memory at startup.
    Fixture(PathBuf),
}

impl std::fmt::Debug for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(_) => f.write_str("Database([REDACTED])"),
            Self::Fixture(path) => f.debug_tuple("Fixture").field(path).finish(),
        }
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Catalog backend
    pub source: CatalogSource,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Currency used when a price range names none
    pub preferred_currency: CurrencyCode,
    /// Page size when the request has no usable `limit`
    pub default_limit: usize,
    /// Facet count semantics
    pub facet_counts: FacetCountMode,
    /// Browse response cache TTL (`None` disables the cache)
    pub browse_cache_ttl: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let source = match vars.get_database_url(DATABASE_URL_VAR) {
            Some(url) => CatalogSource::Database(url),
            None => vars
                .get_optional(FIXTURE_VAR)
                .map(|path| CatalogSource::Fixture(PathBuf::from(path)))
                .ok_or_else(|| ConfigError::MissingEnvVar(DATABASE_URL_VAR.to_string()))?,
        };
        let host = vars.parse_or_default::<IpAddr>("JIRAIBRARY_HOST", "127.0.0.1")?;
        let port = vars.parse_or_default::<u16>("JIRAIBRARY_PORT", "8000")?;
        let preferred_currency =
            vars.parse_or_default::<CurrencyCode>("PREFERRED_CURRENCY_CODE", "USD")?;
        let default_limit =
            vars.parse_or_default::<usize>("JIRAIBRARY_DEFAULT_LIMIT", &DEFAULT_LIMIT.to_string())?;
        let facet_counts = vars.parse_or_default::<FacetCountMode>(
            "JIRAIBRARY_FACET_COUNTS",
            FacetCountMode::default().as_str(),
        )?;
        let ttl_secs = vars.parse_or_default::<u64>("JIRAIBRARY_BROWSE_CACHE_TTL_SECS", "30")?;
        let browse_cache_ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs));

        Ok(Self {
            source,
            host,
            port,
            preferred_currency,
            default_limit,
            facet_counts,
            browse_cache_ttl,
            sentry_dsn: vars.get_optional("SENTRY_DSN"),
            sentry_environment: vars.get_optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Settings handed to the browse engine.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.preferred_currency.clone())
            .with_default_limit(self.default_limit)
            .with_count_mode(self.facet_counts)
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get an optional variable, treating blank values as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn get_database_url(&self, primary_key: &str) -> Option<SecretString> {
        self.get_optional(primary_key)
            .or_else(|| self.get_optional("DATABASE_URL"))
            .map(SecretString::from)
    }

    /// Parse a variable, using `default` when it is unset.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get_optional(key).unwrap_or_else(|| default.to_string());
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("JIRAIBRARY_DATABASE_URL", "postgres://localhost/jiraibrary")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8000");
        assert_eq!(config.preferred_currency.as_str(), "USD");
        assert_eq!(config.default_limit, 60);
        assert_eq!(config.facet_counts, FacetCountMode::ExcludeSelf);
        assert_eq!(config.browse_cache_ttl, Some(Duration::from_secs(30)));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://fly/db")]).unwrap();
        match config.source {
            CatalogSource::Database(url) => assert_eq!(url.expose_secret(), "postgres://fly/db"),
            CatalogSource::Fixture(_) => panic!("expected database source"),
        }
    }

    #[test]
    fn test_fixture_source_when_no_database() {
        let config = load(&[("JIRAIBRARY_FIXTURE", "fixtures/catalog.yaml")]).unwrap();
        assert!(matches!(config.source, CatalogSource::Fixture(ref p) if p.ends_with("catalog.yaml")));
    }

    #[test]
    fn test_missing_source() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "JIRAIBRARY_DATABASE_URL"));
    }

    #[test]
    fn test_invalid_values() {
        let fixture = ("JIRAIBRARY_FIXTURE", "catalog.yaml");
        assert!(matches!(
            load(&[fixture, ("JIRAIBRARY_PORT", "eighty")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            load(&[fixture, ("PREFERRED_CURRENCY_CODE", "dollars")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            load(&[fixture, ("JIRAIBRARY_FACET_COUNTS", "sometimes")]),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn test_engine_settings() {
        let config = load(&[
            ("JIRAIBRARY_FIXTURE", "catalog.yaml"),
            ("PREFERRED_CURRENCY_CODE", "jpy"),
            ("JIRAIBRARY_DEFAULT_LIMIT", "0"),
            ("JIRAIBRARY_FACET_COUNTS", "global"),
            ("JIRAIBRARY_BROWSE_CACHE_TTL_SECS", "0"),
        ])
        .unwrap();
        let engine = config.engine_config();
        assert_eq!(engine.preferred_currency.as_str(), "JPY");
        assert_eq!(engine.default_limit, 0);
        assert_eq!(engine.count_mode, FacetCountMode::Global);
        assert!(config.browse_cache_ttl.is_none());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("JIRAIBRARY_DATABASE_URL", "postgres://user:hunter2@db/jb")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
