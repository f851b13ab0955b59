//! `PgItemRepository` against a real database.
//!
//! These tests require a disposable `PostgreSQL` database; they truncate the
//! `catalog` schema before seeding it with `fixtures/catalog.yaml`.
//!
//! Run with:
//! ```bash
//! JIRAIBRARY_TEST_DATABASE_URL=postgres://localhost/jiraibrary_test \
//!     cargo test -p jiraibrary-api --test postgres_parity -- --ignored --test-threads=1
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use jiraibrary_api::db::{self, PgItemRepository, SeedSummary};
use jiraibrary_api::fixture;
use jiraibrary_core::{CatalogSnapshot, CurrencyCode};
use jiraibrary_facets::{
    EngineConfig, FacetCountMode, FacetedSearchEngine, ItemRepository, MemoryItemRepository,
    Predicate, QueryParams,
};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use sqlx::PgPool;

const FIXTURE: &str = include_str!("../../../fixtures/catalog.yaml");

/// Queries covering every predicate the repository renders.
const QUERIES: &[&str] = &[
    "",
    "brand=baby",
    "brand=ANGELIC-PRETTY&brand=metamorphose",
    "category=00000000-0000-0000-000c-000000000001",
    "subcategory=00000000-0000-0000-000d-000000000002",
    "style=00000000-0000-0000-000e-000000000001",
    "substyle=00000000-0000-0000-000f-000000000001",
    "tag=00000000-0000-0000-0010-000000000001&tag=00000000-0000-0000-0010-000000000002",
    "color=00000000-0000-0000-0011-000000000001",
    "collection=00000000-0000-0000-0012-000000000001",
    "fabric=00000000-0000-0000-0013-000000000001",
    "feature=00000000-0000-0000-0014-000000000001",
    "tag=00000000-0000-0000-0010-0000000000ff",
    "release_year_range=1995:2000&release_year_range=2010:2016",
    "price_range=USD:0:300",
    "price_range=:100:300",
    "price_range=JPY:20000:",
    "measurement_bust_min=90&measurement_waist_max=80",
    "q=garden",
    "q=METAMORPHOSE",
    "q=100%25",
    "limit=1&ordering=-release_year",
    "ordering=created_at",
    "ordering=-brand__slug",
];

async fn seeded_pool() -> (PgPool, CatalogSnapshot) {
    let url = std::env::var("JIRAIBRARY_TEST_DATABASE_URL")
        .expect("JIRAIBRARY_TEST_DATABASE_URL must point at a disposable database");
    let pool = db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query(
        r"
        TRUNCATE catalog.item, catalog.brand, catalog.category, catalog.subcategory,
            catalog.style, catalog.substyle, catalog.tag, catalog.color,
            catalog.collection, catalog.fabric, catalog.feature
        CASCADE
        ",
    )
    .execute(&pool)
    .await
    .expect("Failed to clear catalog schema");

    let snapshot = fixture::parse_yaml(FIXTURE).unwrap();
    db::import_snapshot(&pool, &snapshot)
        .await
        .expect("Failed to seed fixture");
    (pool, snapshot)
}

fn vocabulary_rows(snapshot: &CatalogSnapshot) -> usize {
    snapshot.brands.len()
        + snapshot.categories.len()
        + snapshot.subcategories.len()
        + snapshot.styles.len()
        + snapshot.substyles.len()
        + snapshot.tags.len()
        + snapshot.colors.len()
        + snapshot.collections.len()
        + snapshot.fabrics.len()
        + snapshot.features.len()
}

fn config(mode: FacetCountMode) -> EngineConfig {
    EngineConfig::new(CurrencyCode::parse("USD").unwrap()).with_count_mode(mode)
}

async fn assert_parity(mode: FacetCountMode) {
    let (pool, snapshot) = seeded_pool().await;
    let postgres = FacetedSearchEngine::new(PgItemRepository::new(pool), config(mode));
    let memory = FacetedSearchEngine::new(MemoryItemRepository::new(snapshot), config(mode));

    for query in QUERIES {
        let params = QueryParams::parse(query);
        let expected = memory.browse_params(&params).await.unwrap();
        let actual = postgres
            .browse_params(&params)
            .await
            .unwrap_or_else(|e| panic!("{query}: {e}"));
        assert_eq!(actual, expected, "query: {query}");
    }
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (JIRAIBRARY_TEST_DATABASE_URL)"]
async fn test_browse_matches_memory_repository() {
    assert_parity(FacetCountMode::ExcludeSelf).await;
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (JIRAIBRARY_TEST_DATABASE_URL)"]
async fn test_global_counts_match_memory_repository() {
    assert_parity(FacetCountMode::Global).await;
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (JIRAIBRARY_TEST_DATABASE_URL)"]
async fn test_repository_primitives() {
    let (pool, snapshot) = seeded_pool().await;
    let postgres = PgItemRepository::new(pool);
    let memory = MemoryItemRepository::new(snapshot);

    postgres.ping().await.unwrap();
    assert_eq!(
        postgres.count_published(&Predicate::and([])).await.unwrap(),
        memory.count_published(&Predicate::and([])).await.unwrap()
    );
    assert_eq!(
        postgres.release_year_bounds().await.unwrap(),
        memory.release_year_bounds().await.unwrap()
    );
    assert_eq!(
        postgres.measurement_bounds().await.unwrap(),
        memory.measurement_bounds().await.unwrap()
    );
    assert_eq!(
        postgres.price_stats().await.unwrap(),
        memory.price_stats().await.unwrap()
    );
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database (JIRAIBRARY_TEST_DATABASE_URL)"]
async fn test_seed_is_idempotent() {
    let (pool, snapshot) = seeded_pool().await;
    let again = db::import_snapshot(&pool, &snapshot).await.unwrap();
    assert_eq!(
        again,
        SeedSummary {
            vocabulary: vocabulary_rows(&snapshot),
            items: snapshot.items.len(),
        }
    );

    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog.item")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(usize::try_from(items).unwrap(), snapshot.items.len());
}
