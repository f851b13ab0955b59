//! In-memory [`ItemRepository`] over a [`CatalogSnapshot`].
//!
//! Used by tests, fixture-backed deployments and the CLI. Evaluates the same
//! predicate tree the `PostgreSQL` repository renders to SQL.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use jiraibrary_core::{
    Brand, BrandId, CatalogItem, CatalogSnapshot, CurrencyCode, MeasurementField, StyleId,
    SubstyleId, Vocabulary,
};

use crate::predicate::Predicate;
use crate::repository::{
    Bounds, CurrencyPriceStats, ItemOrder, ItemRepository, ItemSummary, OrderKey,
    RepositoryError,
};
use crate::selection::FacetDimension;

/// Repository backed by an immutable catalog snapshot.
#[derive(Debug, Clone)]
pub struct MemoryItemRepository {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    snapshot: CatalogSnapshot,
    brands: HashMap<BrandId, Brand>,
    style_of_substyle: HashMap<SubstyleId, StyleId>,
}

impl MemoryItemRepository {
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let brands = snapshot
            .brands
            .iter()
            .map(|b| (b.id, b.clone()))
            .collect();
        let style_of_substyle = snapshot
            .substyles
            .iter()
            .map(|s| (s.id, s.style_id))
            .collect();
        Self {
            inner: Arc::new(Inner {
                snapshot,
                brands,
                style_of_substyle,
            }),
        }
    }

    fn published(&self) -> impl Iterator<Item = &CatalogItem> {
        self.inner
            .snapshot
            .items
            .iter()
            .filter(|item| item.status.is_published())
    }

    fn matching<'a>(&'a self, predicate: &'a Predicate) -> impl Iterator<Item = &'a CatalogItem> {
        self.published()
            .filter(move |item| self.inner.matches(item, predicate))
    }
}

impl Inner {
    fn brand_slug(&self, item: &CatalogItem) -> Option<&str> {
        item.brand_id
            .and_then(|id| self.brands.get(&id))
            .map(|b| b.slug.as_str())
    }

    fn styles_of(&self, item: &CatalogItem) -> BTreeSet<StyleId> {
        item.substyle_ids
            .iter()
            .filter_map(|id| self.style_of_substyle.get(id).copied())
            .collect()
    }

    fn matches(&self, item: &CatalogItem, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::True => true,
            Predicate::And(parts) => parts.iter().all(|p| self.matches(item, p)),
            Predicate::Or(parts) => parts.iter().any(|p| self.matches(item, p)),
            Predicate::Brand(slugs) => self
                .brand_slug(item)
                .is_some_and(|slug| slugs.iter().any(|s| s.eq_ignore_ascii_case(slug))),
            Predicate::Category(ids) => item.category_id.is_some_and(|id| ids.contains(&id)),
            Predicate::Subcategory(ids) => {
                item.subcategory_id.is_some_and(|id| ids.contains(&id))
            }
            Predicate::Style(ids) => self.styles_of(item).iter().any(|id| ids.contains(id)),
            Predicate::Substyle(ids) => item.substyle_ids.iter().any(|id| ids.contains(id)),
            Predicate::Tag(ids) => item.tag_ids.iter().any(|id| ids.contains(id)),
            Predicate::Color(ids) => item.color_ids.iter().any(|id| ids.contains(id)),
            Predicate::Collection(ids) => item.collection_ids.iter().any(|id| ids.contains(id)),
            Predicate::Fabric(ids) => item.fabric_ids.iter().any(|id| ids.contains(id)),
            Predicate::Feature(ids) => item.feature_ids.iter().any(|id| ids.contains(id)),
            Predicate::ReleaseYear { min, max } => item.release_year.is_some_and(|year| {
                min.is_none_or(|min| year >= min) && max.is_none_or(|max| year <= max)
            }),
            Predicate::Price { currency, min, max } => item.prices.iter().any(|price| {
                &price.currency == currency
                    && min.is_none_or(|min| price.amount >= min)
                    && max.is_none_or(|max| price.amount <= max)
            }),
            Predicate::Measurement(ranges) => item.measurements.iter().any(|record| {
                ranges.iter().all(|range| {
                    record
                        .get(range.field)
                        .is_some_and(|value| range.contains(value))
                })
            }),
            Predicate::Text(q) => {
                let needle = q.to_lowercase();
                item.slug.to_lowercase().contains(&needle)
                    || self
                        .brand_slug(item)
                        .is_some_and(|slug| slug.to_lowercase().contains(&needle))
                    || item
                        .translations
                        .iter()
                        .any(|t| t.name.to_lowercase().contains(&needle))
            }
        }
    }

    fn facet_keys(&self, item: &CatalogItem, dimension: FacetDimension) -> BTreeSet<String> {
        fn keys<T: ToString>(ids: impl IntoIterator<Item = T>) -> BTreeSet<String> {
            ids.into_iter().map(|id| id.to_string()).collect()
        }
        match dimension {
            FacetDimension::Brand => keys(self.brand_slug(item)),
            FacetDimension::Category => keys(item.category_id),
            FacetDimension::Subcategory => keys(item.subcategory_id),
            FacetDimension::Style => keys(self.styles_of(item)),
            FacetDimension::Substyle => keys(item.substyle_ids.iter()),
            FacetDimension::Tag => keys(item.tag_ids.iter()),
            FacetDimension::Color => keys(item.color_ids.iter()),
            FacetDimension::Collection => keys(item.collection_ids.iter()),
            FacetDimension::Fabric => keys(item.fabric_ids.iter()),
            FacetDimension::Feature => keys(item.feature_ids.iter()),
        }
    }

    fn compare(&self, a: &CatalogItem, b: &CatalogItem, order: &ItemOrder) -> Ordering {
        for term in order.terms() {
            let ordering = match term.key {
                OrderKey::BrandSlug => {
                    nulls_last(self.brand_slug(a), self.brand_slug(b), term.descending)
                }
                OrderKey::ReleaseYear => {
                    nulls_last(a.release_year, b.release_year, term.descending)
                }
                OrderKey::CreatedAt => {
                    nulls_last(Some(a.created_at), Some(b.created_at), term.descending)
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.slug.cmp(&b.slug)
    }

    fn summarize(&self, item: &CatalogItem) -> ItemSummary {
        let brand = item.brand_id.and_then(|id| self.brands.get(&id));
        ItemSummary {
            slug: item.slug.clone(),
            name: item.display_name().to_owned(),
            brand_slug: brand.map(|b| b.slug.clone()),
            brand_name: brand.map(Brand::display_name),
            category_id: item.category_id,
            subcategory_id: item.subcategory_id,
            release_year: item.release_year,
            prices: item.prices.clone(),
        }
    }
}

fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl ItemRepository for MemoryItemRepository {
    async fn vocabulary(&self) -> Result<Vocabulary, RepositoryError> {
        Ok(self.inner.snapshot.vocabulary())
    }

    async fn count_published(&self, predicate: &Predicate) -> Result<u64, RepositoryError> {
        let mut seen = BTreeSet::new();
        Ok(self
            .matching(predicate)
            .filter(|item| seen.insert(item.slug.as_str()))
            .count() as u64)
    }

    async fn list_published(
        &self,
        predicate: &Predicate,
        limit: Option<usize>,
        order: &ItemOrder,
    ) -> Result<Vec<ItemSummary>, RepositoryError> {
        let mut seen = BTreeSet::new();
        let mut items: Vec<&CatalogItem> = self
            .matching(predicate)
            .filter(|item| seen.insert(item.slug.as_str()))
            .collect();
        items.sort_by(|a, b| self.inner.compare(a, b, order));
        Ok(items
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|item| self.inner.summarize(item))
            .collect())
    }

    async fn facet_counts(
        &self,
        dimension: FacetDimension,
        predicate: &Predicate,
    ) -> Result<HashMap<String, u64>, RepositoryError> {
        let mut counts = HashMap::new();
        for item in self.matching(predicate) {
            for key in self.inner.facet_keys(item, dimension) {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn release_year_bounds(&self) -> Result<Bounds<i32>, RepositoryError> {
        let mut bounds = Bounds::default();
        for year in self.published().filter_map(|item| item.release_year) {
            bounds.include(year);
        }
        Ok(bounds)
    }

    async fn measurement_bounds(
        &self,
    ) -> Result<BTreeMap<MeasurementField, Bounds<f64>>, RepositoryError> {
        let mut result: BTreeMap<MeasurementField, Bounds<f64>> = BTreeMap::new();
        for record in self.published().flat_map(|item| item.measurements.iter()) {
            for field in MeasurementField::ALL {
                if let Some(value) = record.get(field).filter(|v| v.is_finite()) {
                    result.entry(field).or_default().include(value);
                }
            }
        }
        Ok(result)
    }

    async fn price_stats(&self) -> Result<Vec<CurrencyPriceStats>, RepositoryError> {
        let mut stats: BTreeMap<CurrencyCode, CurrencyPriceStats> = BTreeMap::new();
        for item in self.published() {
            let mut counted = BTreeSet::new();
            for price in &item.prices {
                let entry = stats
                    .entry(price.currency.clone())
                    .or_insert_with(|| CurrencyPriceStats {
                        currency: price.currency.clone(),
                        item_count: 0,
                        min: price.amount,
                        max: price.amount,
                    });
                entry.min = entry.min.min(price.amount);
                entry.max = entry.max.max(price.amount);
                if counted.insert(&price.currency) {
                    entry.item_count += 1;
                }
            }
        }
        Ok(stats.into_values().collect())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
