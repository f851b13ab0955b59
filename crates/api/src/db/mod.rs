//! Catalog storage for the browse API.
//!
//! # Schema: `catalog`
//!
//! - `brand`, `category`, `subcategory`, `style`, `substyle`, `tag`,
//!   `color`, `collection`, `fabric`, `feature` - reference vocabulary
//! - `item` - catalog items (only `published` rows are browsable)
//! - `item_tag`, `item_color`, `item_substyle`, `item_fabric`,
//!   `item_feature`, `item_collection` - associations
//! - `item_translation`, `item_price`, `item_measurement`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p jiraibrary-cli -- migrate
//! ```

pub mod items;
pub mod seed;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use jiraibrary_core::{MeasurementField, Vocabulary};
use jiraibrary_facets::{
    Bounds, CurrencyPriceStats, FacetDimension, ItemOrder, ItemRepository, ItemSummary,
    MemoryItemRepository, Predicate, RepositoryError,
};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use items::PgItemRepository;
pub use seed::{SeedSummary, import_snapshot};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// The repository the service was started with.
#[derive(Debug, Clone)]
pub enum CatalogBackend {
    Postgres(PgItemRepository),
    Memory(MemoryItemRepository),
}

impl CatalogBackend {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl ItemRepository for CatalogBackend {
    async fn vocabulary(&self) -> Result<Vocabulary, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.vocabulary().await,
            Self::Memory(repo) => repo.vocabulary().await,
        }
    }

    async fn count_published(&self, predicate: &Predicate) -> Result<u64, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.count_published(predicate).await,
            Self::Memory(repo) => repo.count_published(predicate).await,
        }
    }

    async fn list_published(
        &self,
        predicate: &Predicate,
        limit: Option<usize>,
        order: &ItemOrder,
    ) -> Result<Vec<ItemSummary>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.list_published(predicate, limit, order).await,
            Self::Memory(repo) => repo.list_published(predicate, limit, order).await,
        }
    }

    async fn facet_counts(
        &self,
        dimension: FacetDimension,
        predicate: &Predicate,
    ) -> Result<HashMap<String, u64>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.facet_counts(dimension, predicate).await,
            Self::Memory(repo) => repo.facet_counts(dimension, predicate).await,
        }
    }

    async fn release_year_bounds(&self) -> Result<Bounds<i32>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.release_year_bounds().await,
            Self::Memory(repo) => repo.release_year_bounds().await,
        }
    }

    async fn measurement_bounds(
        &self,
    ) -> Result<BTreeMap<MeasurementField, Bounds<f64>>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.measurement_bounds().await,
            Self::Memory(repo) => repo.measurement_bounds().await,
        }
    }

    async fn price_stats(&self) -> Result<Vec<CurrencyPriceStats>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.price_stats().await,
            Self::Memory(repo) => repo.price_stats().await,
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.ping().await,
            Self::Memory(repo) => repo.ping().await,
        }
    }
}
