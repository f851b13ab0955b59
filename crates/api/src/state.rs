//! Application state shared across handlers.

use std::sync::Arc;

use jiraibrary_facets::{FacetedSearchEngine, MemoryItemRepository};
use thiserror::Error;

use crate::catalog::CatalogService;
use crate::config::{ApiConfig, CatalogSource};
use crate::db::{self, CatalogBackend, PgItemRepository};
use crate::fixture::{self, FixtureError};

/// Error connecting the configured catalog backend.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// browse service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: CatalogService,
}

impl AppState {
    /// Create application state over an already-connected backend.
    #[must_use]
    pub fn new(config: &ApiConfig, backend: CatalogBackend) -> Self {
        let engine = FacetedSearchEngine::new(backend, config.engine_config());
        let catalog = CatalogService::new(engine, config.browse_cache_ttl);

        Self {
            inner: Arc::new(AppStateInner { catalog }),
        }
    }

    /// Connect the backend named by `config` and build the state.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` if the database is unreachable or the fixture
    /// cannot be loaded.
    pub async fn connect(config: &ApiConfig) -> Result<Self, StartupError> {
        let backend = match &config.source {
            CatalogSource::Database(url) => {
                let pool = db::create_pool(url).await?;
                tracing::info!("Database pool created");
                CatalogBackend::Postgres(PgItemRepository::new(pool))
            }
            CatalogSource::Fixture(path) => {
                let snapshot = fixture::load_snapshot(path).await?;
                CatalogBackend::Memory(MemoryItemRepository::new(snapshot))
            }
        };
        tracing::info!(backend = backend.kind(), "Catalog backend ready");

        Ok(Self::new(config, backend))
    }

    /// Get a reference to the browse service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
