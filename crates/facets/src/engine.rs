//! The browse entry point.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use jiraibrary_core::CurrencyCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::active::{self, ActiveFilterChip};
use crate::options::{FacetInputs, Facets};
use crate::params::QueryParams;
use crate::predicate::Predicate;
use crate::repository::{ItemOrder, ItemRepository, ItemSummary, RepositoryError};
use crate::selection::{FacetDimension, SelectedFilters};

/// Page size when `limit` is missing or unparseable.
pub const DEFAULT_LIMIT: usize = 60;

/// Which items a facet option's `item_count` is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetCountMode {
    /// Published items matching every selected dimension except the
    /// option's own.
    #[default]
    ExcludeSelf,
    /// All published items, ignoring the selection.
    Global,
}

impl FacetCountMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExcludeSelf => "exclude_self",
            Self::Global => "global",
        }
    }
}

impl std::fmt::Display for FacetCountMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetCountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "exclude_self" => Ok(Self::ExcludeSelf),
            "global" => Ok(Self::Global),
            other => Err(format!("invalid facet count mode: {other}")),
        }
    }
}

/// Engine settings, passed in explicitly rather than read from globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Currency used for price ranges without a currency token and
    /// preferred when presenting the price facet.
    pub preferred_currency: CurrencyCode,
    /// Page size when the request has no usable `limit`. Zero returns all.
    pub default_limit: usize,
    pub count_mode: FacetCountMode,
}

impl EngineConfig {
    #[must_use]
    pub fn new(preferred_currency: CurrencyCode) -> Self {
        Self {
            preferred_currency,
            default_limit: DEFAULT_LIMIT,
            count_mode: FacetCountMode::default(),
        }
    }

    #[must_use]
    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    #[must_use]
    pub fn with_count_mode(mut self, count_mode: FacetCountMode) -> Self {
        self.count_mode = count_mode;
        self
    }
}

/// A parsed browse request.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseRequest {
    pub selected: SelectedFilters,
    /// `None` returns every match.
    pub limit: Option<usize>,
    pub order: ItemOrder,
}

impl BrowseRequest {
    /// Parse a request. Never fails.
    ///
    /// `limit` that is missing or not an integer falls back to the configured
    /// default; `limit <= 0` means no limit.
    #[must_use]
    pub fn from_params(params: &QueryParams, config: &EngineConfig) -> Self {
        let default_limit = Some(config.default_limit).filter(|n| *n > 0);
        let limit = match params.get("limit").and_then(|raw| raw.trim().parse::<i64>().ok()) {
            None => default_limit,
            Some(n) if n <= 0 => None,
            Some(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        };
        Self {
            selected: SelectedFilters::from_params(params, &config.preferred_currency),
            limit,
            order: ItemOrder::parse(params.get("ordering")),
        }
    }

    /// Key identifying this request's response.
    ///
    /// Built from the parsed selection, so repeated values and parameter
    /// interleaving don't matter. Value order and the submitted tokens do,
    /// because both are echoed back.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{}|tokens={}|limit={}|ordering={}",
            serde_json::to_string(&self.selected).unwrap_or_default(),
            serde_json::to_string(&self.selected.value_keys).unwrap_or_default(),
            self.limit.map_or_else(|| "all".to_owned(), |n| n.to_string()),
            self.order.to_param()
        )
    }
}

/// The parsed selection echoed back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedEcho {
    #[serde(flatten)]
    pub filters: SelectedFilters,
    /// Currency the price facet is presented in.
    pub price_currency: CurrencyCode,
}

/// Everything the list endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseResponse {
    pub results: Vec<ItemSummary>,
    /// Total matches before `limit` is applied.
    pub result_count: u64,
    pub filters: Facets,
    pub selected: SelectedEcho,
    pub active_filters: Vec<ActiveFilterChip>,
}

/// Faceted browse over an [`ItemRepository`].
#[derive(Debug, Clone)]
pub struct FacetedSearchEngine<R> {
    repository: R,
    config: EngineConfig,
}

impl<R: ItemRepository> FacetedSearchEngine<R> {
    #[must_use]
    pub const fn new(repository: R, config: EngineConfig) -> Self {
        Self { repository, config }
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse `params` and browse.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any repository call fails.
    pub async fn browse_params(
        &self,
        params: &QueryParams,
    ) -> Result<BrowseResponse, RepositoryError> {
        let request = BrowseRequest::from_params(params, &self.config);
        self.browse(&request).await
    }

    /// Run one browse pass: matching items, facets and active filters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any repository call fails.
    #[instrument(
        skip(self, request),
        fields(count_mode = %self.config.count_mode, limit = ?request.limit)
    )]
    pub async fn browse(&self, request: &BrowseRequest) -> Result<BrowseResponse, RepositoryError> {
        let predicate = Predicate::compile(&request.selected);

        let result_count = self.repository.count_published(&predicate).await?;
        let mut results = self
            .repository
            .list_published(&predicate, request.limit, &request.order)
            .await?;
        let mut seen = HashSet::new();
        results.retain(|item| seen.insert(item.slug.clone()));

        let mut counts = HashMap::new();
        for dimension in FacetDimension::ALL {
            let facet_predicate = match self.config.count_mode {
                FacetCountMode::ExcludeSelf => {
                    Predicate::compile_excluding(&request.selected, dimension)
                }
                FacetCountMode::Global => Predicate::True,
            };
            let dimension_counts = self
                .repository
                .facet_counts(dimension, &facet_predicate)
                .await?;
            counts.insert(dimension, dimension_counts);
        }

        let vocabulary = self.repository.vocabulary().await?;
        let release_years = self.repository.release_year_bounds().await?;
        let measurements = self.repository.measurement_bounds().await?;
        let prices = self.repository.price_stats().await?;

        let filters = Facets::build(&FacetInputs {
            vocabulary: &vocabulary,
            selected: &request.selected,
            counts: &counts,
            release_years,
            measurements: &measurements,
            prices: &prices,
            preferred_currency: &self.config.preferred_currency,
        });
        let active_filters = active::summarize(&request.selected, &vocabulary);
        let price_currency = filters.prices.currency.clone();

        tracing::debug!(
            result_count,
            returned = results.len(),
            active = active_filters.len(),
            "browse complete"
        );

        Ok(BrowseResponse {
            results,
            result_count,
            filters,
            selected: SelectedEcho {
                filters: request.selected.clone(),
                price_currency,
            },
            active_filters,
        })
    }
}
