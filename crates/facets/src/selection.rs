//! Typed filter selection parsed from request parameters.
//!
//! The parser is total. Every malformed value (bad UUID, bad number, bad
//! currency code, empty string) is dropped as if it had not been sent.
//! Multi-valued parameters are de-duplicated while keeping first-seen order.
//! Brand slugs compare case-insensitively and UUIDs by value; the first
//! token submitted for each value is kept for chip removal.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use jiraibrary_core::{
    CategoryId, CollectionId, ColorId, CurrencyCode, FabricId, FeatureId, MeasurementField,
    StyleId, SubcategoryId, SubstyleId, TagId,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::params::QueryParams;

/// Free-text search parameter.
pub const SEARCH_PARAM: &str = "q";
/// Repeatable `"<min>:<max>"` release year range parameter.
pub const RELEASE_YEAR_RANGE_PARAM: &str = "release_year_range";
/// Repeatable `"<currency>:<min>:<max>"` price range parameter.
pub const PRICE_RANGE_PARAM: &str = "price_range";

/// A discrete, multi-valued facet dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetDimension {
    Brand,
    Category,
    Subcategory,
    Style,
    Substyle,
    Tag,
    Color,
    Collection,
    Fabric,
    Feature,
}

impl FacetDimension {
    /// Every discrete dimension, in active-filter chip order.
    pub const ALL: [Self; 10] = [
        Self::Brand,
        Self::Category,
        Self::Subcategory,
        Self::Style,
        Self::Substyle,
        Self::Tag,
        Self::Color,
        Self::Fabric,
        Self::Feature,
        Self::Collection,
    ];

    /// Query parameter name.
    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Style => "style",
            Self::Substyle => "substyle",
            Self::Tag => "tag",
            Self::Color => "color",
            Self::Collection => "collection",
            Self::Fabric => "fabric",
            Self::Feature => "feature",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Brand => "Brand",
            Self::Category => "Category",
            Self::Subcategory => "Subcategory",
            Self::Style => "Style",
            Self::Substyle => "Substyle",
            Self::Tag => "Tag",
            Self::Color => "Color",
            Self::Collection => "Collection",
            Self::Fabric => "Fabric",
            Self::Feature => "Feature",
        }
    }
}

impl std::fmt::Display for FacetDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.param())
    }
}

/// One accepted `release_year_range` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
    /// The raw parameter value, byte-for-byte.
    pub value_key: String,
}

impl YearRange {
    /// Parse `"<min>:<max>"`, `"<min>:"`, `":<max>"` or a bare `"<min>"`.
    ///
    /// Returns `None` when neither side is a valid integer.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (min_raw, max_raw) = raw.split_once(':').unwrap_or((raw, ""));
        let min = parse_optional_int(min_raw);
        let max = parse_optional_int(max_raw);
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self {
            min,
            max,
            value_key: raw.to_owned(),
        })
    }

    /// Whether `year` falls inside this (inclusive) range.
    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        self.min.is_none_or(|min| year >= min) && self.max.is_none_or(|max| year <= max)
    }
}

/// One accepted `price_range` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub min: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max: Option<Decimal>,
    /// The raw parameter value, byte-for-byte.
    pub value_key: String,
}

impl PriceRange {
    /// Parse `"<currency>:<min>:<max>"`.
    ///
    /// One part is currency-only, two parts are currency and minimum. An
    /// empty currency falls back to `preferred`. Returns `None` when the
    /// currency is malformed or neither bound is a valid decimal.
    #[must_use]
    pub fn parse(raw: &str, preferred: &CurrencyCode) -> Option<Self> {
        let mut parts = raw.splitn(3, ':');
        let currency_raw = parts.next().unwrap_or_default();
        let min = parts.next().and_then(parse_optional_decimal);
        let max = parts.next().and_then(parse_optional_decimal);
        if min.is_none() && max.is_none() {
            return None;
        }
        let currency = if currency_raw.trim().is_empty() {
            preferred.clone()
        } else {
            CurrencyCode::parse(currency_raw).ok()?
        };
        Some(Self {
            currency,
            min,
            max,
            value_key: raw.to_owned(),
        })
    }

    /// Whether `amount` in `currency` satisfies this range.
    #[must_use]
    pub fn matches(&self, currency: &CurrencyCode, amount: Decimal) -> bool {
        &self.currency == currency
            && self.min.is_none_or(|min| amount >= min)
            && self.max.is_none_or(|max| amount <= max)
    }
}

/// One measurement bound with the raw string it was parsed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementBound {
    pub value: f64,
    pub value_key: String,
}

/// Optional lower/upper bound for one body measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasurementBounds {
    pub min: Option<MeasurementBound>,
    pub max: Option<MeasurementBound>,
}

impl MeasurementBounds {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// The parsed request state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectedFilters {
    pub q: Option<String>,
    #[serde(rename = "brand")]
    pub brands: IndexSet<String>,
    #[serde(rename = "category")]
    pub categories: IndexSet<CategoryId>,
    #[serde(rename = "subcategory")]
    pub subcategories: IndexSet<SubcategoryId>,
    #[serde(rename = "style")]
    pub styles: IndexSet<StyleId>,
    #[serde(rename = "substyle")]
    pub substyles: IndexSet<SubstyleId>,
    #[serde(rename = "tag")]
    pub tags: IndexSet<TagId>,
    #[serde(rename = "color")]
    pub colors: IndexSet<ColorId>,
    #[serde(rename = "collection")]
    pub collections: IndexSet<CollectionId>,
    #[serde(rename = "fabric")]
    pub fabrics: IndexSet<FabricId>,
    #[serde(rename = "feature")]
    pub features: IndexSet<FeatureId>,
    pub measurements: BTreeMap<MeasurementField, MeasurementBounds>,
    pub release_year_ranges: Vec<YearRange>,
    pub price_ranges: Vec<PriceRange>,
    /// Submitted token per selected key, by dimension.
    #[serde(skip)]
    pub value_keys: BTreeMap<FacetDimension, IndexMap<String, String>>,
}

impl SelectedFilters {
    /// Parse filters from request parameters.
    ///
    /// `preferred_currency` fills in price ranges submitted without a
    /// currency token.
    #[must_use]
    pub fn from_params(params: &QueryParams, preferred_currency: &CurrencyCode) -> Self {
        let q = params
            .get(SEARCH_PARAM)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_owned);

        let mut value_keys = BTreeMap::new();
        let mut brands = IndexSet::new();
        for raw in params.get_all(FacetDimension::Brand.param()) {
            let slug = raw.trim().to_lowercase();
            if !slug.is_empty() && brands.insert(slug.clone()) {
                record_value_key(&mut value_keys, FacetDimension::Brand, slug, raw);
            }
        }

        let mut measurements = BTreeMap::new();
        for field in MeasurementField::ALL {
            let bounds = MeasurementBounds {
                min: parse_measurement_bound(params.get(field.min_param())),
                max: parse_measurement_bound(params.get(field.max_param())),
            };
            if !bounds.is_empty() {
                measurements.insert(field, bounds);
            }
        }

        let mut release_year_ranges: Vec<YearRange> = Vec::new();
        for range in params
            .get_all(RELEASE_YEAR_RANGE_PARAM)
            .filter_map(YearRange::parse)
        {
            if !release_year_ranges
                .iter()
                .any(|r| r.value_key == range.value_key)
            {
                release_year_ranges.push(range);
            }
        }

        let mut price_ranges: Vec<PriceRange> = Vec::new();
        for range in params
            .get_all(PRICE_RANGE_PARAM)
            .filter_map(|raw| PriceRange::parse(raw, preferred_currency))
        {
            if !price_ranges.iter().any(|r| r.value_key == range.value_key) {
                price_ranges.push(range);
            }
        }

        let vk = &mut value_keys;
        let categories = parse_ids(params, FacetDimension::Category, vk);
        let subcategories = parse_ids(params, FacetDimension::Subcategory, vk);
        let styles = parse_ids(params, FacetDimension::Style, vk);
        let substyles = parse_ids(params, FacetDimension::Substyle, vk);
        let tags = parse_ids(params, FacetDimension::Tag, vk);
        let colors = parse_ids(params, FacetDimension::Color, vk);
        let collections = parse_ids(params, FacetDimension::Collection, vk);
        let fabrics = parse_ids(params, FacetDimension::Fabric, vk);
        let features = parse_ids(params, FacetDimension::Feature, vk);

        Self {
            q,
            brands,
            categories,
            subcategories,
            styles,
            substyles,
            tags,
            colors,
            collections,
            fabrics,
            features,
            measurements,
            release_year_ranges,
            price_ranges,
            value_keys,
        }
    }

    /// Whether nothing at all is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.q.is_none()
            && FacetDimension::ALL.iter().all(|d| self.selected_keys(*d).is_empty())
            && self.measurements.is_empty()
            && self.release_year_ranges.is_empty()
            && self.price_ranges.is_empty()
    }

    /// Selected values of `dimension` as their textual keys (slug or UUID).
    #[must_use]
    pub fn selected_keys(&self, dimension: FacetDimension) -> IndexSet<String> {
        fn keys<T: ToString>(set: &IndexSet<T>) -> IndexSet<String> {
            set.iter().map(ToString::to_string).collect()
        }
        match dimension {
            FacetDimension::Brand => self.brands.clone(),
            FacetDimension::Category => keys(&self.categories),
            FacetDimension::Subcategory => keys(&self.subcategories),
            FacetDimension::Style => keys(&self.styles),
            FacetDimension::Substyle => keys(&self.substyles),
            FacetDimension::Tag => keys(&self.tags),
            FacetDimension::Color => keys(&self.colors),
            FacetDimension::Collection => keys(&self.collections),
            FacetDimension::Fabric => keys(&self.fabrics),
            FacetDimension::Feature => keys(&self.features),
        }
    }

    /// The token submitted for the selected `key` of `dimension`.
    ///
    /// Falls back to `key` for selections built without parsing.
    #[must_use]
    pub fn value_key<'a>(&'a self, dimension: FacetDimension, key: &'a str) -> &'a str {
        self.value_keys
            .get(&dimension)
            .and_then(|keys| keys.get(key))
            .map_or(key, String::as_str)
    }

    /// A copy with `dimension` cleared.
    #[must_use]
    pub fn without(&self, dimension: FacetDimension) -> Self {
        let mut copy = self.clone();
        match dimension {
            FacetDimension::Brand => copy.brands.clear(),
            FacetDimension::Category => copy.categories.clear(),
            FacetDimension::Subcategory => copy.subcategories.clear(),
            FacetDimension::Style => copy.styles.clear(),
            FacetDimension::Substyle => copy.substyles.clear(),
            FacetDimension::Tag => copy.tags.clear(),
            FacetDimension::Color => copy.colors.clear(),
            FacetDimension::Collection => copy.collections.clear(),
            FacetDimension::Fabric => copy.fabrics.clear(),
            FacetDimension::Feature => copy.features.clear(),
        }
        copy.value_keys.remove(&dimension);
        copy
    }
}

/// Parse an integer, treating blanks and garbage as absent.
#[must_use]
pub fn parse_optional_int(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Parse a decimal, treating blanks and garbage as absent.
#[must_use]
pub fn parse_optional_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

/// Parse a finite float, treating blanks, garbage, `NaN` and infinities as
/// absent.
#[must_use]
pub fn parse_optional_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_measurement_bound(raw: Option<&str>) -> Option<MeasurementBound> {
    let raw = raw?;
    parse_optional_float(raw).map(|value| MeasurementBound {
        value,
        value_key: raw.to_owned(),
    })
}

fn record_value_key(
    value_keys: &mut BTreeMap<FacetDimension, IndexMap<String, String>>,
    dimension: FacetDimension,
    key: String,
    raw: &str,
) {
    value_keys
        .entry(dimension)
        .or_default()
        .insert(key, raw.to_owned());
}

fn parse_ids<T>(
    params: &QueryParams,
    dimension: FacetDimension,
    value_keys: &mut BTreeMap<FacetDimension, IndexMap<String, String>>,
) -> IndexSet<T>
where
    T: FromStr + Display + std::hash::Hash + Eq,
{
    let mut ids = IndexSet::new();
    for raw in params.get_all(dimension.param()) {
        let Ok(id) = raw.trim().parse::<T>() else {
            continue;
        };
        let key = id.to_string();
        if ids.insert(id) {
            record_value_key(value_keys, dimension, key, raw);
        }
    }
    ids
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TAG_A: &str = "6f1c2a2e-8f4b-4d3a-9c57-1f0b8e2d4a10";
    const TAG_B: &str = "0c7e4f5a-1d2b-4e3c-8a9f-2b3c4d5e6f70";

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn parse(query: &str) -> SelectedFilters {
        SelectedFilters::from_params(&QueryParams::parse(query), &usd())
    }

    #[test]
    fn test_year_range_forms() {
        let full = YearRange::parse("1995:2000").unwrap();
        assert_eq!((full.min, full.max), (Some(1995), Some(2000)));

        let open_max = YearRange::parse("2010:").unwrap();
        assert_eq!((open_max.min, open_max.max), (Some(2010), None));

        let open_min = YearRange::parse(":2000").unwrap();
        assert_eq!((open_min.min, open_min.max), (None, Some(2000)));

        let bare = YearRange::parse("2004").unwrap();
        assert_eq!((bare.min, bare.max), (Some(2004), None));
    }

    #[test]
    fn test_year_range_discards_empty_and_garbage() {
        assert!(YearRange::parse("").is_none());
        assert!(YearRange::parse(":").is_none());
        assert!(YearRange::parse("abc:def").is_none());
    }

    #[test]
    fn test_year_range_keeps_valid_side_of_partial_garbage() {
        let range = YearRange::parse("abc:2000").unwrap();
        assert_eq!((range.min, range.max), (None, Some(2000)));
        assert_eq!(range.value_key, "abc:2000");
    }

    #[test]
    fn test_year_range_contains_inclusive() {
        let range = YearRange::parse("1995:2000").unwrap();
        assert!(range.contains(1995));
        assert!(range.contains(2000));
        assert!(!range.contains(2001));
        assert!(YearRange::parse("2010:").unwrap().contains(3000));
    }

    #[test]
    fn test_price_range_forms() {
        let full = PriceRange::parse("USD:0:500", &usd()).unwrap();
        assert_eq!(full.currency.as_str(), "USD");
        assert_eq!(full.min, Some(Decimal::ZERO));
        assert_eq!(full.max, Some(Decimal::from(500)));

        let min_only = PriceRange::parse("jpy:5000", &usd()).unwrap();
        assert_eq!(min_only.currency.as_str(), "JPY");
        assert_eq!(min_only.min, Some(Decimal::from(5000)));
        assert_eq!(min_only.max, None);
    }

    #[test]
    fn test_price_range_defaults_currency() {
        let eur = CurrencyCode::parse("EUR").unwrap();
        let range = PriceRange::parse(":100:200", &eur).unwrap();
        assert_eq!(range.currency, eur);
        assert_eq!(range.value_key, ":100:200");
    }

    #[test]
    fn test_price_range_discards_unbounded_and_bad_currency() {
        assert!(PriceRange::parse("USD", &usd()).is_none());
        assert!(PriceRange::parse("USD::", &usd()).is_none());
        assert!(PriceRange::parse("USD:x:y", &usd()).is_none());
        assert!(PriceRange::parse("DOLLARS:1:2", &usd()).is_none());
    }

    #[test]
    fn test_price_range_extra_colons_leave_max_unparsed() {
        let range = PriceRange::parse("USD:1:2:3", &usd()).unwrap();
        assert_eq!(range.min, Some(Decimal::ONE));
        assert_eq!(range.max, None);
    }

    #[test]
    fn test_float_parsing_rejects_non_finite() {
        assert_eq!(parse_optional_float(" 82.5 "), Some(82.5));
        assert_eq!(parse_optional_float("NaN"), None);
        assert_eq!(parse_optional_float("inf"), None);
        assert_eq!(parse_optional_float(""), None);
    }

    #[test]
    fn test_from_params_dedupes_preserving_order() {
        let selected = parse(&format!("tag={TAG_B}&tag={TAG_A}&tag={TAG_B}"));
        let tags: Vec<String> = selected.tags.iter().map(ToString::to_string).collect();
        assert_eq!(tags, vec![TAG_B.to_owned(), TAG_A.to_owned()]);
    }

    #[test]
    fn test_from_params_drops_malformed_values() {
        let selected = parse(
            "category=not-a-uuid&brand=&q=%20%20&measurement_bust_min=lots&release_year_range=x:y",
        );
        assert!(selected.is_empty());
    }

    #[test]
    fn test_from_params_brand_slugs_normalized() {
        let selected = parse("brand=Angelic-Pretty&brand=angelic-pretty&brand=baby");
        assert_eq!(
            selected.brands.iter().cloned().collect::<Vec<_>>(),
            vec!["angelic-pretty".to_owned(), "baby".to_owned()]
        );
    }

    #[test]
    fn test_value_keys_keep_first_submitted_token() {
        let upper = TAG_A.to_uppercase();
        let selected = parse(&format!("brand=%20Baby&brand=baby&tag={upper}&tag={TAG_A}"));
        assert_eq!(selected.brands.len(), 1);
        assert_eq!(selected.value_key(FacetDimension::Brand, "baby"), " Baby");
        assert_eq!(selected.tags.len(), 1);
        assert_eq!(selected.value_key(FacetDimension::Tag, TAG_A), upper);
        assert_eq!(selected.value_key(FacetDimension::Color, TAG_B), TAG_B);
    }

    #[test]
    fn test_from_params_measurements() {
        let selected = parse("measurement_bust_min=80&measurement_waist_max=70.50");
        let bust = selected.measurements.get(&MeasurementField::Bust).unwrap();
        assert_eq!(bust.min.as_ref().unwrap().value, 80.0);
        assert!(bust.max.is_none());
        let waist = selected.measurements.get(&MeasurementField::Waist).unwrap();
        assert_eq!(waist.max.as_ref().unwrap().value_key, "70.50");
        assert!(!selected.measurements.contains_key(&MeasurementField::Hip));
    }

    #[test]
    fn test_from_params_dedupes_ranges_by_value_key() {
        let selected = parse("release_year_range=1995:2000&release_year_range=1995:2000");
        assert_eq!(selected.release_year_ranges.len(), 1);
    }

    #[test]
    fn test_without_clears_only_one_dimension() {
        let selected = parse(&format!("tag={TAG_A}&brand=baby"));
        let cleared = selected.without(FacetDimension::Tag);
        assert!(cleared.tags.is_empty());
        assert_eq!(cleared.brands.len(), 1);
    }

    #[test]
    fn test_selected_serializes_with_param_names() {
        let selected = parse("brand=baby&price_range=USD:0:500&release_year_range=2000:2006");
        let json = serde_json::to_value(&selected).unwrap();
        assert_eq!(json["brand"], serde_json::json!(["baby"]));
        assert_eq!(
            json["release_year_ranges"],
            serde_json::json!([{"min": 2000, "max": 2006, "value_key": "2000:2006"}])
        );
        assert_eq!(
            json["price_ranges"],
            serde_json::json!([{"currency": "USD", "min": 0.0, "max": 500.0, "value_key": "USD:0:500"}])
        );
    }
}
