//! Shared fixture loading for engine tests.

#![allow(dead_code, clippy::unwrap_used)]

use jiraibrary_core::{CatalogSnapshot, CurrencyCode};
use jiraibrary_facets::{
    BrowseResponse, EngineConfig, FacetedSearchEngine, MemoryItemRepository, QueryParams,
};

pub const FIXTURE: &str = include_str!("../../../../fixtures/catalog.yaml");

pub const BOWS: &str = "00000000-0000-0000-0010-000000000001";
pub const LACE: &str = "00000000-0000-0000-0010-000000000002";
pub const SHIRRING: &str = "00000000-0000-0000-0010-000000000003";
pub const PINK: &str = "00000000-0000-0000-0011-000000000001";
pub const IVORY: &str = "00000000-0000-0000-0011-000000000002";
pub const DRESS: &str = "00000000-0000-0000-000c-000000000001";
pub const SKIRT: &str = "00000000-0000-0000-000c-000000000002";
pub const JSK: &str = "00000000-0000-0000-000d-000000000001";
pub const OP: &str = "00000000-0000-0000-000d-000000000002";
pub const SWEET: &str = "00000000-0000-0000-000e-000000000001";
pub const CLASSIC: &str = "00000000-0000-0000-000e-000000000002";
pub const OLD_SCHOOL: &str = "00000000-0000-0000-000f-000000000001";
pub const SWEET_DREAMER: &str = "00000000-0000-0000-0012-000000000001";
pub const COTTON: &str = "00000000-0000-0000-0013-000000000001";
pub const POCKETS: &str = "00000000-0000-0000-0014-000000000001";

pub fn snapshot() -> CatalogSnapshot {
    serde_yaml::from_str(FIXTURE).unwrap()
}

pub fn currency(code: &str) -> CurrencyCode {
    CurrencyCode::parse(code).unwrap()
}

pub fn engine_with(config: EngineConfig) -> FacetedSearchEngine<MemoryItemRepository> {
    FacetedSearchEngine::new(MemoryItemRepository::new(snapshot()), config)
}

pub fn engine() -> FacetedSearchEngine<MemoryItemRepository> {
    engine_with(EngineConfig::new(currency("USD")))
}

pub async fn browse(
    engine: &FacetedSearchEngine<MemoryItemRepository>,
    query: &str,
) -> BrowseResponse {
    engine.browse_params(&QueryParams::parse(query)).await.unwrap()
}

pub fn slugs(response: &BrowseResponse) -> Vec<&str> {
    response.results.iter().map(|r| r.slug.as_str()).collect()
}
