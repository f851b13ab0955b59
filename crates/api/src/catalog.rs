//! Browse service: the facet engine behind a short-lived response cache.
//!
//! Responses are cached by the parsed request (selection, limit and
//! ordering), so `?brand=baby&limit=5` and `?limit=5&brand=baby&brand=BABY`
//! share an entry.

use std::sync::Arc;
use std::time::Duration;

use jiraibrary_facets::{
    BrowseRequest, BrowseResponse, FacetedSearchEngine, ItemRepository, QueryParams,
    RepositoryError,
};
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::db::CatalogBackend;

/// Faceted browse over the configured catalog backend.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    engine: FacetedSearchEngine<CatalogBackend>,
    cache: Option<Cache<String, Arc<BrowseResponse>>>,
}

impl CatalogService {
    /// Create a new service. `cache_ttl` of `None` disables caching.
    #[must_use]
    pub fn new(engine: FacetedSearchEngine<CatalogBackend>, cache_ttl: Option<Duration>) -> Self {
        let cache = cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(ttl)
                .build()
        });

        Self {
            inner: Arc::new(CatalogServiceInner { engine, cache }),
        }
    }

    /// Browse with raw query parameters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails. Parameter problems are
    /// never errors.
    #[instrument(skip(self, params))]
    pub async fn browse(
        &self,
        params: &QueryParams,
    ) -> Result<Arc<BrowseResponse>, RepositoryError> {
        let request = BrowseRequest::from_params(params, self.inner.engine.config());

        let Some(cache) = &self.inner.cache else {
            return Ok(Arc::new(self.inner.engine.browse(&request).await?));
        };

        let cache_key = request.cache_key();
        if let Some(response) = cache.get(&cache_key).await {
            debug!("Cache hit for browse");
            return Ok(response);
        }

        let response = Arc::new(self.inner.engine.browse(&request).await?);
        cache.insert(cache_key, Arc::clone(&response)).await;
        Ok(response)
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend cannot be reached.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.engine.repository().ping().await
    }
}
