//! Facet option lists.
//!
//! Every discrete dimension yields a list of [`FacetOption`]s annotated with
//! an item count and a selection flag. An option is listed when it has
//! matching items or is currently selected; a selected option is never
//! dropped, not even by the per-dimension cap. Selected values missing from
//! the vocabulary are listed too, named by their key.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use jiraibrary_core::{
    BrandId, CollectionSeason, CurrencyCode, FeatureCategory, MeasurementField, TagType,
    Vocabulary,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::repository::{Bounds, CurrencyPriceStats};
use crate::selection::{FacetDimension, PriceRange, SelectedFilters, YearRange};

/// One selectable value of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    /// The value submitted in the query string (brand slug or UUID).
    pub id: String,
    pub name: String,
    pub selected: bool,
    pub item_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex_code: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tag_type: Option<TagType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FeatureCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<CollectionSeason>,
    /// Parent category or style for nested options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FacetOption>,
}

impl FacetOption {
    fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            selected: false,
            item_count: 0,
            slug: None,
            country: None,
            hex_code: None,
            tag_type: None,
            category: None,
            brand_slug: None,
            year: None,
            season: None,
            parent_id: None,
            children: Vec::new(),
        }
    }
}

/// Range facet for one body measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementFacet {
    pub field: MeasurementField,
    pub label: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub selected_min: Option<f64>,
    pub selected_max: Option<f64>,
}

/// Release year range facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearFacet {
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub selected: Vec<YearRange>,
}

/// A currency with priced published items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyOption {
    pub code: CurrencyCode,
    pub item_count: u64,
    pub selected: bool,
}

/// Price range facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceFacet {
    /// Currency the range below is expressed in.
    pub currency: CurrencyCode,
    pub preferred_currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub min: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max: Option<Decimal>,
    pub currencies: Vec<CurrencyOption>,
    pub selected: Vec<PriceRange>,
}

/// Every facet returned by a browse request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facets {
    pub brands: Vec<FacetOption>,
    /// Categories with their subcategories nested as children.
    pub categories: Vec<FacetOption>,
    /// Styles with their substyles nested as children.
    pub styles: Vec<FacetOption>,
    pub tags: Vec<FacetOption>,
    pub colors: Vec<FacetOption>,
    pub collections: Vec<FacetOption>,
    pub fabrics: Vec<FacetOption>,
    pub features: Vec<FacetOption>,
    pub measurements: Vec<MeasurementFacet>,
    pub release_years: YearFacet,
    pub prices: PriceFacet,
}

/// Everything the builder needs, already fetched from the repository.
#[derive(Debug, Clone, Copy)]
pub struct FacetInputs<'a> {
    pub vocabulary: &'a Vocabulary,
    pub selected: &'a SelectedFilters,
    /// Per-dimension counts keyed by option id.
    pub counts: &'a HashMap<FacetDimension, HashMap<String, u64>>,
    pub release_years: Bounds<i32>,
    pub measurements: &'a BTreeMap<MeasurementField, Bounds<f64>>,
    pub prices: &'a [CurrencyPriceStats],
    pub preferred_currency: &'a CurrencyCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisplayOrder {
    CountThenName,
    CountThenId,
    Name,
    YearDescThenName,
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    cap: usize,
    order: DisplayOrder,
}

const fn layout(dimension: FacetDimension) -> Layout {
    let (cap, order) = match dimension {
        FacetDimension::Brand => (24, DisplayOrder::CountThenId),
        FacetDimension::Category | FacetDimension::Style => (24, DisplayOrder::Name),
        FacetDimension::Subcategory | FacetDimension::Substyle => (60, DisplayOrder::Name),
        FacetDimension::Tag | FacetDimension::Fabric | FacetDimension::Feature => {
            (30, DisplayOrder::CountThenName)
        }
        FacetDimension::Color => (24, DisplayOrder::CountThenName),
        FacetDimension::Collection => (24, DisplayOrder::YearDescThenName),
    };
    Layout { cap, order }
}

fn name_cmp(a: &FacetOption, b: &FacetOption) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

fn display_cmp(order: DisplayOrder, a: &FacetOption, b: &FacetOption) -> Ordering {
    match order {
        DisplayOrder::CountThenName => b
            .item_count
            .cmp(&a.item_count)
            .then_with(|| name_cmp(a, b)),
        DisplayOrder::CountThenId => b.item_count.cmp(&a.item_count).then_with(|| a.id.cmp(&b.id)),
        DisplayOrder::Name => name_cmp(a, b),
        DisplayOrder::YearDescThenName => match (a.year, b.year) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| name_cmp(a, b)),
    }
}

/// Keep listed options, cap by count, order for display, then re-append any
/// selected option the cap removed.
fn finalize(mut options: Vec<FacetOption>, layout: Layout) -> Vec<FacetOption> {
    options.retain(|o| o.item_count > 0 || o.selected);
    options.sort_by(|a, b| {
        b.item_count
            .cmp(&a.item_count)
            .then_with(|| display_cmp(layout.order, a, b))
    });
    let overflow = if options.len() > layout.cap {
        options.split_off(layout.cap)
    } else {
        Vec::new()
    };
    options.sort_by(|a, b| display_cmp(layout.order, a, b));

    let mut rescued: Vec<FacetOption> = overflow.into_iter().filter(|o| o.selected).collect();
    rescued.sort_by(|a, b| display_cmp(layout.order, a, b));
    options.extend(rescued);
    options
}

fn annotate(
    dimension: FacetDimension,
    candidates: impl IntoIterator<Item = FacetOption>,
    inputs: &FacetInputs<'_>,
) -> Vec<FacetOption> {
    let counts = inputs.counts.get(&dimension);
    let selected = inputs.selected.selected_keys(dimension);
    candidates
        .into_iter()
        .map(|mut option| {
            option.item_count = counts
                .and_then(|c| c.get(&option.id))
                .copied()
                .unwrap_or(0);
            option.selected = selected.contains(&selection_key(dimension, &option.id));
            option
        })
        .collect()
}

/// Key an option id is selected under. Brand slugs compare
/// case-insensitively.
fn selection_key(dimension: FacetDimension, id: &str) -> String {
    match dimension {
        FacetDimension::Brand => id.to_lowercase(),
        _ => id.to_owned(),
    }
}

/// Append a selected, zero-count option for every selected key of
/// `dimensions` that no listed option (or child) carries.
fn with_unlisted(
    mut options: Vec<FacetOption>,
    dimensions: &[FacetDimension],
    inputs: &FacetInputs<'_>,
) -> Vec<FacetOption> {
    for &dimension in dimensions {
        for key in inputs.selected.selected_keys(dimension) {
            let listed = options.iter().any(|o| {
                selection_key(dimension, &o.id) == key
                    || o.children.iter().any(|c| selection_key(dimension, &c.id) == key)
            });
            if !listed {
                let mut option = FacetOption::new(key.clone(), key);
                option.selected = true;
                options.push(option);
            }
        }
    }
    options
}

/// Attach children to their parents. A parent counts as selected when any
/// of its children is.
fn nest(parents: &mut [FacetOption], children: &[FacetOption]) {
    for parent in parents {
        parent.children = children
            .iter()
            .filter(|child| child.parent_id.as_deref() == Some(parent.id.as_str()))
            .cloned()
            .collect();
        if parent.children.iter().any(|c| c.selected) {
            parent.selected = true;
        }
    }
}

/// Choose the currency to present prices in.
///
/// The configured currency wins when any published item is priced in it.
/// Otherwise the currency covering the most items is used (ties broken by
/// code), falling back to the configured one for an unpriced catalog.
#[must_use]
pub fn resolve_preferred_currency(
    stats: &[CurrencyPriceStats],
    configured: &CurrencyCode,
) -> CurrencyCode {
    if stats
        .iter()
        .any(|s| &s.currency == configured && s.item_count > 0)
    {
        return configured.clone();
    }
    stats
        .iter()
        .filter(|s| s.item_count > 0)
        .min_by(|a, b| {
            b.item_count
                .cmp(&a.item_count)
                .then_with(|| a.currency.cmp(&b.currency))
        })
        .map_or_else(|| configured.clone(), |s| s.currency.clone())
}

/// Currency of the first selected price range, else `preferred`.
#[must_use]
pub fn active_currency(selected: &SelectedFilters, preferred: &CurrencyCode) -> CurrencyCode {
    selected
        .price_ranges
        .first()
        .map_or_else(|| preferred.clone(), |r| r.currency.clone())
}

impl Facets {
    /// Assemble every facet from repository results.
    #[must_use]
    pub fn build(inputs: &FacetInputs<'_>) -> Self {
        let vocab = inputs.vocabulary;
        let brand_slugs: HashMap<BrandId, &str> = vocab
            .brands
            .iter()
            .map(|b| (b.id, b.slug.as_str()))
            .collect();

        let brands = annotate(
            FacetDimension::Brand,
            vocab.brands.iter().map(|b| {
                let mut option = FacetOption::new(b.slug.clone(), b.display_name());
                option.country.clone_from(&b.country);
                option
            }),
            inputs,
        );

        let subcategories = finalize(
            annotate(
                FacetDimension::Subcategory,
                vocab.subcategories.iter().map(|s| {
                    let mut option = FacetOption::new(s.id.to_string(), s.name.clone());
                    option.slug = Some(s.slug.clone());
                    option.parent_id = Some(s.category_id.to_string());
                    option
                }),
                inputs,
            ),
            layout(FacetDimension::Subcategory),
        );
        let mut categories = annotate(
            FacetDimension::Category,
            vocab.categories.iter().map(|c| {
                let mut option = FacetOption::new(c.id.to_string(), c.name.clone());
                option.slug = Some(c.slug.clone());
                option
            }),
            inputs,
        );
        nest(&mut categories, &subcategories);

        let substyles = finalize(
            annotate(
                FacetDimension::Substyle,
                vocab.substyles.iter().map(|s| {
                    let mut option = FacetOption::new(s.id.to_string(), s.name.clone());
                    option.slug = Some(s.slug.clone());
                    option.parent_id = Some(s.style_id.to_string());
                    option
                }),
                inputs,
            ),
            layout(FacetDimension::Substyle),
        );
        let mut styles = annotate(
            FacetDimension::Style,
            vocab.styles.iter().map(|s| {
                let mut option = FacetOption::new(s.id.to_string(), s.name.clone());
                option.slug = Some(s.slug.clone());
                option
            }),
            inputs,
        );
        nest(&mut styles, &substyles);

        let tags = annotate(
            FacetDimension::Tag,
            vocab.tags.iter().map(|t| {
                let mut option = FacetOption::new(t.id.to_string(), t.name.clone());
                option.slug = Some(t.slug.clone());
                option.tag_type = Some(t.tag_type);
                option
            }),
            inputs,
        );

        let colors = annotate(
            FacetDimension::Color,
            vocab.colors.iter().map(|c| {
                let mut option = FacetOption::new(c.id.to_string(), c.name.clone());
                option.hex_code.clone_from(&c.hex_code);
                option
            }),
            inputs,
        );

        let collections = annotate(
            FacetDimension::Collection,
            vocab.collections.iter().map(|c| {
                let mut option = FacetOption::new(c.id.to_string(), c.name.clone());
                option.year = c.year;
                option.season = c.season;
                option.brand_slug = c
                    .brand_id
                    .and_then(|id| brand_slugs.get(&id))
                    .map(|slug| (*slug).to_owned());
                option
            }),
            inputs,
        );

        let fabrics = annotate(
            FacetDimension::Fabric,
            vocab
                .fabrics
                .iter()
                .map(|f| FacetOption::new(f.id.to_string(), f.name.clone())),
            inputs,
        );

        let features = annotate(
            FacetDimension::Feature,
            vocab.features.iter().map(|f| {
                let mut option = FacetOption::new(f.id.to_string(), f.name.clone());
                option.category = Some(f.category);
                option
            }),
            inputs,
        );

        Self {
            brands: with_unlisted(
                finalize(brands, layout(FacetDimension::Brand)),
                &[FacetDimension::Brand],
                inputs,
            ),
            categories: with_unlisted(
                finalize(categories, layout(FacetDimension::Category)),
                &[FacetDimension::Category, FacetDimension::Subcategory],
                inputs,
            ),
            styles: with_unlisted(
                finalize(styles, layout(FacetDimension::Style)),
                &[FacetDimension::Style, FacetDimension::Substyle],
                inputs,
            ),
            tags: with_unlisted(
                finalize(tags, layout(FacetDimension::Tag)),
                &[FacetDimension::Tag],
                inputs,
            ),
            colors: with_unlisted(
                finalize(colors, layout(FacetDimension::Color)),
                &[FacetDimension::Color],
                inputs,
            ),
            collections: with_unlisted(
                finalize(collections, layout(FacetDimension::Collection)),
                &[FacetDimension::Collection],
                inputs,
            ),
            fabrics: with_unlisted(
                finalize(fabrics, layout(FacetDimension::Fabric)),
                &[FacetDimension::Fabric],
                inputs,
            ),
            features: with_unlisted(
                finalize(features, layout(FacetDimension::Feature)),
                &[FacetDimension::Feature],
                inputs,
            ),
            measurements: measurement_facets(inputs),
            release_years: YearFacet {
                min: inputs.release_years.min,
                max: inputs.release_years.max,
                selected: inputs.selected.release_year_ranges.clone(),
            },
            prices: price_facet(inputs),
        }
    }
}

fn measurement_facets(inputs: &FacetInputs<'_>) -> Vec<MeasurementFacet> {
    MeasurementField::ALL
        .into_iter()
        .map(|field| {
            let bounds = inputs.measurements.get(&field).copied().unwrap_or_default();
            let selected = inputs.selected.measurements.get(&field);
            MeasurementFacet {
                field,
                label: field.label(),
                min: bounds.min,
                max: bounds.max,
                selected_min: selected.and_then(|s| s.min.as_ref()).map(|b| b.value),
                selected_max: selected.and_then(|s| s.max.as_ref()).map(|b| b.value),
            }
        })
        .collect()
}

fn price_facet(inputs: &FacetInputs<'_>) -> PriceFacet {
    let preferred = resolve_preferred_currency(inputs.prices, inputs.preferred_currency);
    let currency = active_currency(inputs.selected, &preferred);
    let active_stats = inputs.prices.iter().find(|s| s.currency == currency);
    PriceFacet {
        min: active_stats.map(|s| s.min),
        max: active_stats.map(|s| s.max),
        currencies: inputs
            .prices
            .iter()
            .filter(|s| s.item_count > 0)
            .map(|s| CurrencyOption {
                code: s.currency.clone(),
                item_count: s.item_count,
                selected: s.currency == currency,
            })
            .collect(),
        selected: inputs.selected.price_ranges.clone(),
        currency,
        preferred_currency: preferred,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::params::QueryParams;
    use jiraibrary_core::{Brand, Category, CategoryId, Subcategory, SubcategoryId, Tag, TagId};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn stats(code: &str, item_count: u64) -> CurrencyPriceStats {
        CurrencyPriceStats {
            currency: CurrencyCode::parse(code).unwrap(),
            item_count,
            min: Decimal::ONE,
            max: Decimal::TEN,
        }
    }

    fn tag(n: u128, name: &str) -> Tag {
        Tag {
            id: TagId::new(Uuid::from_u128(n)),
            name: name.to_owned(),
            slug: name.to_lowercase(),
            tag_type: TagType::Detail,
        }
    }

    fn build(vocabulary: &Vocabulary, query: &str, counts: &[(FacetDimension, &str, u64)]) -> Facets {
        let selected = SelectedFilters::from_params(&QueryParams::parse(query), &usd());
        let mut count_map: HashMap<FacetDimension, HashMap<String, u64>> = HashMap::new();
        for (dimension, key, count) in counts {
            count_map
                .entry(*dimension)
                .or_default()
                .insert((*key).to_owned(), *count);
        }
        Facets::build(&FacetInputs {
            vocabulary,
            selected: &selected,
            counts: &count_map,
            release_years: Bounds::default(),
            measurements: &BTreeMap::new(),
            prices: &[],
            preferred_currency: &usd(),
        })
    }

    #[test]
    fn test_zero_count_options_hidden_unless_selected() {
        let vocabulary = Vocabulary {
            tags: vec![tag(1, "Bows"), tag(2, "Lace"), tag(3, "Ruffles")],
            ..Vocabulary::default()
        };
        let bows = Uuid::from_u128(1).to_string();
        let ruffles = Uuid::from_u128(3).to_string();

        let facets = build(
            &vocabulary,
            &format!("tag={ruffles}"),
            &[(FacetDimension::Tag, bows.as_str(), 4)],
        );
        let names: Vec<(&str, u64, bool)> = facets
            .tags
            .iter()
            .map(|o| (o.name.as_str(), o.item_count, o.selected))
            .collect();
        assert_eq!(names, vec![("Bows", 4, false), ("Ruffles", 0, true)]);
    }

    #[test]
    fn test_cap_keeps_highest_counts_and_rescues_selection() {
        let tags: Vec<Tag> = (1..=40).map(|n| tag(n, &format!("Tag {n:02}"))).collect();
        let counts: Vec<(FacetDimension, String, u64)> = tags
            .iter()
            .enumerate()
            .map(|(i, t)| (FacetDimension::Tag, t.id.to_string(), 100 - i as u64))
            .collect();
        let borrowed: Vec<(FacetDimension, &str, u64)> =
            counts.iter().map(|(d, k, c)| (*d, k.as_str(), *c)).collect();
        let vocabulary = Vocabulary {
            tags,
            ..Vocabulary::default()
        };
        let last = Uuid::from_u128(40).to_string();

        let facets = build(&vocabulary, &format!("tag={last}"), &borrowed);
        assert_eq!(facets.tags.len(), 31);
        assert_eq!(facets.tags[0].name, "Tag 01");
        assert_eq!(facets.tags[29].name, "Tag 30");
        assert_eq!(facets.tags[30].name, "Tag 40");
        assert!(facets.tags[30].selected);
    }

    #[test]
    fn test_brand_order_and_display_name() {
        let brand = |slug: &str| Brand {
            id: BrandId::new(Uuid::new_v4()),
            slug: slug.to_owned(),
            names: BTreeMap::new(),
            country: Some("JP".to_owned()),
        };
        let vocabulary = Vocabulary {
            brands: vec![brand("meta"), brand("baby"), brand("angelic-pretty")],
            ..Vocabulary::default()
        };
        let facets = build(
            &vocabulary,
            "",
            &[
                (FacetDimension::Brand, "meta", 3),
                (FacetDimension::Brand, "baby", 5),
                (FacetDimension::Brand, "angelic-pretty", 3),
            ],
        );
        let ids: Vec<&str> = facets.brands.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["baby", "angelic-pretty", "meta"]);
        assert_eq!(facets.brands[1].name, "Angelic Pretty");
        assert_eq!(facets.brands[1].country.as_deref(), Some("JP"));
    }

    #[test]
    fn test_mixed_case_brand_slug_stays_selected() {
        let vocabulary = Vocabulary {
            brands: vec![Brand {
                id: BrandId::new(Uuid::new_v4()),
                slug: "Mary-Magdalene".to_owned(),
                names: BTreeMap::new(),
                country: None,
            }],
            ..Vocabulary::default()
        };
        let facets = build(&vocabulary, "brand=Mary-Magdalene", &[]);
        assert_eq!(facets.brands.len(), 1);
        assert_eq!(facets.brands[0].id, "Mary-Magdalene");
        assert_eq!(facets.brands[0].name, "Mary Magdalene");
        assert!(facets.brands[0].selected);
    }

    #[test]
    fn test_unknown_selection_listed_by_key() {
        let vocabulary = Vocabulary {
            tags: vec![tag(1, "Bows")],
            ..Vocabulary::default()
        };
        let bows = Uuid::from_u128(1).to_string();
        let unknown = Uuid::from_u128(0xff).to_string();
        let orphan = Uuid::from_u128(0xee).to_string();

        let facets = build(
            &vocabulary,
            &format!("tag={}&brand=No-Such-Brand&subcategory={orphan}", unknown.to_uppercase()),
            &[(FacetDimension::Tag, bows.as_str(), 2)],
        );
        let tags: Vec<(&str, &str, u64, bool)> = facets
            .tags
            .iter()
            .map(|o| (o.id.as_str(), o.name.as_str(), o.item_count, o.selected))
            .collect();
        assert_eq!(
            tags,
            vec![
                (bows.as_str(), "Bows", 2, false),
                (unknown.as_str(), unknown.as_str(), 0, true),
            ]
        );
        assert_eq!(facets.brands.len(), 1);
        assert_eq!(facets.brands[0].id, "no-such-brand");
        assert!(facets.brands[0].selected);
        assert_eq!(facets.categories.len(), 1);
        assert_eq!(facets.categories[0].id, orphan);
    }

    #[test]
    fn test_selected_child_marks_parent_selected() {
        let category = Category {
            id: CategoryId::new(Uuid::from_u128(10)),
            name: "Dresses".to_owned(),
            slug: "dresses".to_owned(),
        };
        let subcategory = Subcategory {
            id: SubcategoryId::new(Uuid::from_u128(11)),
            category_id: category.id,
            name: "OP".to_owned(),
            slug: "op".to_owned(),
        };
        let vocabulary = Vocabulary {
            categories: vec![category.clone()],
            subcategories: vec![subcategory.clone()],
            ..Vocabulary::default()
        };
        let facets = build(
            &vocabulary,
            &format!("subcategory={}", subcategory.id),
            &[(FacetDimension::Category, &category.id.to_string(), 2)],
        );
        assert_eq!(facets.categories.len(), 1);
        let parent = &facets.categories[0];
        assert!(parent.selected);
        assert_eq!(parent.children.len(), 1);
        assert!(parent.children[0].selected);
        assert_eq!(parent.children[0].item_count, 0);
    }

    #[test]
    fn test_preferred_currency_resolution() {
        let configured = usd();
        assert_eq!(
            resolve_preferred_currency(&[stats("JPY", 3), stats("USD", 1)], &configured),
            configured
        );
        assert_eq!(
            resolve_preferred_currency(&[stats("EUR", 2), stats("JPY", 2)], &configured).as_str(),
            "EUR"
        );
        assert_eq!(resolve_preferred_currency(&[], &configured), configured);
    }

    #[test]
    fn test_price_facet_follows_selected_currency() {
        let selected =
            SelectedFilters::from_params(&QueryParams::parse("price_range=JPY:1000:"), &usd());
        let prices = [stats("JPY", 2), stats("USD", 4)];
        let facets = Facets::build(&FacetInputs {
            vocabulary: &Vocabulary::default(),
            selected: &selected,
            counts: &HashMap::new(),
            release_years: Bounds::default(),
            measurements: &BTreeMap::new(),
            prices: &prices,
            preferred_currency: &usd(),
        });
        assert_eq!(facets.prices.currency.as_str(), "JPY");
        assert_eq!(facets.prices.preferred_currency.as_str(), "USD");
        let selected_codes: Vec<&str> = facets
            .prices
            .currencies
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(selected_codes, vec!["JPY"]);
    }

    #[test]
    fn test_measurement_facets_cover_every_field() {
        let facets = build(&Vocabulary::default(), "measurement_hip_max=100", &[]);
        assert_eq!(facets.measurements.len(), 4);
        let hip = facets
            .measurements
            .iter()
            .find(|m| m.field == MeasurementField::Hip)
            .unwrap();
        assert_eq!(hip.selected_max, Some(100.0));
        assert_eq!(hip.min, None);
    }
}
