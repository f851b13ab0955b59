//! Active filter chips.
//!
//! One chip per distinct selected value, in a fixed dimension order. Each
//! chip's `value_key` is the exact token that was submitted (the first one,
//! when equivalent tokens were repeated), so a client can remove the filter
//! by dropping that `param=value_key` pair from its query string.

use std::collections::HashMap;

use jiraibrary_core::{MeasurementField, Vocabulary};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::selection::{
    FacetDimension, PRICE_RANGE_PARAM, PriceRange, RELEASE_YEAR_RANGE_PARAM, SEARCH_PARAM,
    SelectedFilters, YearRange,
};

/// A removable summary of one applied filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilterChip {
    /// Dimension label (e.g., `Brand`, `Bust`).
    pub label: String,
    /// Display value (e.g., `Angelic Pretty`, `≥ 80`).
    pub value: String,
    /// Query parameter name.
    pub param: String,
    /// The exact parameter value to remove.
    pub value_key: String,
}

impl ActiveFilterChip {
    fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        param: impl Into<String>,
        value_key: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            param: param.into(),
            value_key: value_key.into(),
        }
    }
}

/// Display names for every vocabulary entry, keyed the way selections are.
struct NameIndex {
    names: HashMap<(FacetDimension, String), String>,
}

impl NameIndex {
    fn new(vocabulary: &Vocabulary) -> Self {
        let mut names = HashMap::new();
        let mut add = |dimension: FacetDimension, key: String, name: String| {
            names.insert((dimension, key), name);
        };
        for b in &vocabulary.brands {
            add(FacetDimension::Brand, b.slug.to_lowercase(), b.display_name());
        }
        for c in &vocabulary.categories {
            add(FacetDimension::Category, c.id.to_string(), c.name.clone());
        }
        for s in &vocabulary.subcategories {
            add(FacetDimension::Subcategory, s.id.to_string(), s.name.clone());
        }
        for s in &vocabulary.styles {
            add(FacetDimension::Style, s.id.to_string(), s.name.clone());
        }
        for s in &vocabulary.substyles {
            add(FacetDimension::Substyle, s.id.to_string(), s.name.clone());
        }
        for t in &vocabulary.tags {
            add(FacetDimension::Tag, t.id.to_string(), t.name.clone());
        }
        for c in &vocabulary.colors {
            add(FacetDimension::Color, c.id.to_string(), c.name.clone());
        }
        for f in &vocabulary.fabrics {
            add(FacetDimension::Fabric, f.id.to_string(), f.name.clone());
        }
        for f in &vocabulary.features {
            add(FacetDimension::Feature, f.id.to_string(), f.name.clone());
        }
        for c in &vocabulary.collections {
            add(FacetDimension::Collection, c.id.to_string(), c.display_label());
        }
        Self { names }
    }

    fn get(&self, dimension: FacetDimension, key: &str) -> Option<&str> {
        self.names
            .get(&(dimension, key.to_owned()))
            .map(String::as_str)
    }
}

/// Build the ordered chip list for a selection.
///
/// Selected identifiers missing from the vocabulary still get a chip, using
/// the identifier itself as the display value.
#[must_use]
pub fn summarize(selected: &SelectedFilters, vocabulary: &Vocabulary) -> Vec<ActiveFilterChip> {
    let index = NameIndex::new(vocabulary);
    let mut chips = Vec::new();

    if let Some(q) = &selected.q {
        chips.push(ActiveFilterChip::new("Search", q, SEARCH_PARAM, q));
    }

    for dimension in FacetDimension::ALL {
        for key in selected.selected_keys(dimension) {
            let value = index.get(dimension, &key).unwrap_or(key.as_str()).to_owned();
            chips.push(ActiveFilterChip::new(
                dimension.label(),
                value,
                dimension.param(),
                selected.value_key(dimension, &key),
            ));
        }
    }

    for field in MeasurementField::ALL {
        let Some(bounds) = selected.measurements.get(&field) else {
            continue;
        };
        if let Some(min) = &bounds.min {
            chips.push(ActiveFilterChip::new(
                field.label(),
                format!("≥ {}", min.value),
                field.min_param(),
                &min.value_key,
            ));
        }
        if let Some(max) = &bounds.max {
            chips.push(ActiveFilterChip::new(
                field.label(),
                format!("≤ {}", max.value),
                field.max_param(),
                &max.value_key,
            ));
        }
    }

    for range in &selected.release_year_ranges {
        chips.push(ActiveFilterChip::new(
            "Release year",
            year_label(range),
            RELEASE_YEAR_RANGE_PARAM,
            &range.value_key,
        ));
    }

    for range in &selected.price_ranges {
        chips.push(ActiveFilterChip::new(
            "Price",
            price_label(range),
            PRICE_RANGE_PARAM,
            &range.value_key,
        ));
    }

    chips
}

fn year_label(range: &YearRange) -> String {
    match (range.min, range.max) {
        (Some(min), Some(max)) => format!("{min}–{max}"),
        (Some(min), None) => format!("≥ {min}"),
        (None, Some(max)) => format!("≤ {max}"),
        (None, None) => String::new(),
    }
}

fn price_label(range: &PriceRange) -> String {
    let amount = |d: Decimal| d.normalize().to_string();
    match (range.min, range.max) {
        (Some(min), Some(max)) => format!("{} {}–{}", range.currency, amount(min), amount(max)),
        (Some(min), None) => format!("{} ≥ {}", range.currency, amount(min)),
        (None, Some(max)) => format!("{} ≤ {}", range.currency, amount(max)),
        (None, None) => range.currency.to_string(),
    }
}
