//! Jiraibrary Facets - faceted browse over the item catalog.
//!
//! Given a set of selected filter values, the engine produces in one pass:
//! 1. the matching (published) item set and its true total count,
//! 2. per-dimension facet options annotated with selection state and counts,
//! 3. an ordered list of removable "active filter" chips.
//!
//! # Pipeline
//!
//! ```text
//! query string ──► QueryParams ──► SelectedFilters ──► Predicate ──► ItemRepository
//!                    (params)        (selection)       (predicate)      (repository)
//!                                          │                                 │
//!                                          ├──► ActiveFilterChip  (active)   │
//!                                          └──► Facets ◄─────────────────────┘
//!                                                (options)
//! ```
//!
//! Parsing is total: malformed numbers, UUIDs, or currency codes degrade to
//! "filter not applied" and never produce an error. The only fallible step is
//! the repository.
//!
//! # Modules
//!
//! - [`params`] - Multi-valued query-string map
//! - [`selection`] - Typed filter selection and its permissive parser
//! - [`predicate`] - Predicate AST handed to the repository
//! - [`repository`] - `ItemRepository` trait and result types
//! - [`memory`] - In-memory repository over a `CatalogSnapshot`
//! - [`options`] - Facet option lists with counts and selection flags
//! - [`active`] - Active filter chip summarization
//! - [`engine`] - `FacetedSearchEngine` tying it all together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod active;
pub mod engine;
pub mod memory;
pub mod options;
pub mod params;
pub mod predicate;
pub mod repository;
pub mod selection;

pub use active::ActiveFilterChip;
pub use engine::{
    BrowseRequest, BrowseResponse, DEFAULT_LIMIT, EngineConfig, FacetCountMode,
    FacetedSearchEngine, SelectedEcho,
};
pub use memory::MemoryItemRepository;
pub use options::{CurrencyOption, FacetOption, Facets, MeasurementFacet, PriceFacet, YearFacet};
pub use params::QueryParams;
pub use predicate::Predicate;
pub use repository::{
    Bounds, CurrencyPriceStats, ItemOrder, ItemRepository, ItemSummary, OrderKey, OrderTerm,
    RepositoryError,
};
pub use selection::{FacetDimension, PriceRange, SelectedFilters, YearRange};
