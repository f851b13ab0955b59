//! The query surface the engine consumes.
//!
//! Implementations only ever consider published items. Every method is
//! read-only.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use jiraibrary_core::{
    CategoryId, CurrencyCode, MeasurementField, Price, SubcategoryId, Vocabulary,
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::predicate::Predicate;
use crate::selection::FacetDimension;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Error from the storage driver.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Stored data could not be decoded into domain types.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The backend is not reachable.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Wrap a driver error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Row returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub slug: String,
    pub name: String,
    pub brand_slug: Option<String>,
    pub brand_name: Option<String>,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    pub release_year: Option<i32>,
    pub prices: Vec<Price>,
}

/// Sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKey {
    BrandSlug,
    ReleaseYear,
    CreatedAt,
}

impl OrderKey {
    /// The `ordering` parameter spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrandSlug => "brand__slug",
            Self::ReleaseYear => "release_year",
            Self::CreatedAt => "created_at",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "brand__slug" => Some(Self::BrandSlug),
            "release_year" => Some(Self::ReleaseYear),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

/// One sort term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderTerm {
    pub key: OrderKey,
    pub descending: bool,
}

/// Result ordering. Nulls always sort last; ties are broken by slug
/// ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemOrder {
    terms: Vec<OrderTerm>,
}

impl Default for ItemOrder {
    fn default() -> Self {
        Self {
            terms: vec![OrderTerm {
                key: OrderKey::BrandSlug,
                descending: false,
            }],
        }
    }
}

impl ItemOrder {
    /// Parse a comma-separated `ordering` value such as `-release_year,brand__slug`.
    ///
    /// Unknown terms are skipped. When nothing usable remains, the default
    /// order (brand slug, then slug) applies.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let mut terms: Vec<OrderTerm> = Vec::new();
        for term in raw.unwrap_or_default().split(',').map(str::trim) {
            let (descending, name) = term
                .strip_prefix('-')
                .map_or((false, term), |rest| (true, rest));
            if let Some(key) = OrderKey::parse(name)
                && !terms.iter().any(|t| t.key == key)
            {
                terms.push(OrderTerm { key, descending });
            }
        }
        if terms.is_empty() {
            return Self::default();
        }
        Self { terms }
    }

    #[must_use]
    pub fn terms(&self) -> &[OrderTerm] {
        &self.terms
    }

    /// Canonical `ordering` string.
    #[must_use]
    pub fn to_param(&self) -> String {
        self.terms
            .iter()
            .map(|t| {
                if t.descending {
                    format!("-{}", t.key.as_str())
                } else {
                    t.key.as_str().to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Observed minimum and maximum of a numeric attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    /// Widen to include `value`.
    pub fn include(&mut self, value: T) {
        if self.min.is_none_or(|min| value < min) {
            self.min = Some(value);
        }
        if self.max.is_none_or(|max| value > max) {
            self.max = Some(value);
        }
    }
}

/// Price coverage for one currency across published items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPriceStats {
    pub currency: CurrencyCode,
    /// Distinct published items with at least one price in this currency.
    pub item_count: u64,
    pub min: Decimal,
    pub max: Decimal,
}

/// Read-only query surface over the published item catalog.
pub trait ItemRepository: Send + Sync {
    /// Reference data for every facet dimension.
    fn vocabulary(&self) -> impl Future<Output = Result<Vocabulary, RepositoryError>> + Send;

    /// Number of distinct published items matching `predicate`.
    fn count_published(
        &self,
        predicate: &Predicate,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Distinct published items matching `predicate` in `order`, at most
    /// `limit` of them (`None` returns all).
    fn list_published(
        &self,
        predicate: &Predicate,
        limit: Option<usize>,
        order: &ItemOrder,
    ) -> impl Future<Output = Result<Vec<ItemSummary>, RepositoryError>> + Send;

    /// For every value of `dimension`, the number of distinct published
    /// items carrying that value and matching `predicate`.
    ///
    /// Keys are brand slugs for [`FacetDimension::Brand`] and hyphenated
    /// UUID strings otherwise. Values with no matching item may be omitted.
    fn facet_counts(
        &self,
        dimension: FacetDimension,
        predicate: &Predicate,
    ) -> impl Future<Output = Result<HashMap<String, u64>, RepositoryError>> + Send;

    /// Release year range over published items.
    fn release_year_bounds(
        &self,
    ) -> impl Future<Output = Result<Bounds<i32>, RepositoryError>> + Send;

    /// Per-field measurement range over published items' measurement
    /// records. Fields with no recorded value are omitted.
    fn measurement_bounds(
        &self,
    ) -> impl Future<Output = Result<BTreeMap<MeasurementField, Bounds<f64>>, RepositoryError>> + Send;

    /// Price coverage per currency over published items, ordered by
    /// currency code.
    fn price_stats(
        &self,
    ) -> impl Future<Output = Result<Vec<CurrencyPriceStats>, RepositoryError>> + Send;

    /// Check that the backend is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
