//! Predicate AST handed to an [`ItemRepository`](crate::ItemRepository).
//!
//! A compiled predicate is an AND across dimensions of ORs within a
//! dimension. Repositories only ever see published items, so publication
//! status is not part of the tree.

use jiraibrary_core::{
    CategoryId, CollectionId, ColorId, CurrencyCode, FabricId, FeatureId, MeasurementField,
    StyleId, SubcategoryId, SubstyleId, TagId,
};
use rust_decimal::Decimal;

use crate::selection::{FacetDimension, SelectedFilters};

/// One bound on a single measurement field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRange {
    pub field: MeasurementField,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl MeasurementRange {
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Boolean expression over item attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every item.
    True,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// Brand slug is one of these (lowercase).
    Brand(Vec<String>),
    Category(Vec<CategoryId>),
    Subcategory(Vec<SubcategoryId>),
    /// Item has a substyle belonging to one of these styles.
    Style(Vec<StyleId>),
    Substyle(Vec<SubstyleId>),
    Tag(Vec<TagId>),
    Color(Vec<ColorId>),
    Collection(Vec<CollectionId>),
    Fabric(Vec<FabricId>),
    Feature(Vec<FeatureId>),
    /// Inclusive release year range. Items without a year never match.
    ReleaseYear { min: Option<i32>, max: Option<i32> },
    /// Item has a price record in `currency` inside the inclusive range.
    Price {
        currency: CurrencyCode,
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    /// Item has a single measurement record satisfying every range.
    Measurement(Vec<MeasurementRange>),
    /// Case-insensitive substring match on slug, brand slug, or any
    /// translated name.
    Text(String),
}

impl Predicate {
    /// Conjunction with `True` operands removed and nested `And`s flattened.
    #[must_use]
    pub fn and(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for part in parts {
            match part {
                Self::True => {}
                Self::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::True,
            1 => flat.pop().unwrap_or(Self::True),
            _ => Self::And(flat),
        }
    }

    /// Disjunction. An empty disjunction is treated as "no constraint".
    #[must_use]
    pub fn or(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut flat: Vec<Self> = parts.into_iter().collect();
        if flat.iter().any(|p| matches!(p, Self::True)) {
            return Self::True;
        }
        match flat.len() {
            0 => Self::True,
            1 => flat.pop().unwrap_or(Self::True),
            _ => Self::Or(flat),
        }
    }

    /// Whether this predicate constrains anything.
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    /// Compile a selection into a predicate.
    #[must_use]
    pub fn compile(selected: &SelectedFilters) -> Self {
        let mut parts = Vec::new();

        if let Some(q) = &selected.q {
            parts.push(Self::Text(q.clone()));
        }
        if !selected.brands.is_empty() {
            parts.push(Self::Brand(selected.brands.iter().cloned().collect()));
        }
        push_ids(&mut parts, &selected.categories, Self::Category);
        push_ids(&mut parts, &selected.subcategories, Self::Subcategory);
        push_ids(&mut parts, &selected.styles, Self::Style);
        push_ids(&mut parts, &selected.substyles, Self::Substyle);
        push_ids(&mut parts, &selected.tags, Self::Tag);
        push_ids(&mut parts, &selected.colors, Self::Color);
        push_ids(&mut parts, &selected.collections, Self::Collection);
        push_ids(&mut parts, &selected.fabrics, Self::Fabric);
        push_ids(&mut parts, &selected.features, Self::Feature);

        let ranges: Vec<MeasurementRange> = selected
            .measurements
            .iter()
            .map(|(field, bounds)| MeasurementRange {
                field: *field,
                min: bounds.min.as_ref().map(|b| b.value),
                max: bounds.max.as_ref().map(|b| b.value),
            })
            .collect();
        if !ranges.is_empty() {
            parts.push(Self::Measurement(ranges));
        }

        if !selected.release_year_ranges.is_empty() {
            parts.push(Self::or(selected.release_year_ranges.iter().map(|r| {
                Self::ReleaseYear {
                    min: r.min,
                    max: r.max,
                }
            })));
        }

        if !selected.price_ranges.is_empty() {
            parts.push(Self::or(selected.price_ranges.iter().map(|r| Self::Price {
                currency: r.currency.clone(),
                min: r.min,
                max: r.max,
            })));
        }

        Self::and(parts)
    }

    /// Compile everything except `dimension`. Used for facet counts that
    /// ignore the dimension's own selection.
    #[must_use]
    pub fn compile_excluding(selected: &SelectedFilters, dimension: FacetDimension) -> Self {
        Self::compile(&selected.without(dimension))
    }
}

fn push_ids<T: Copy>(
    parts: &mut Vec<Predicate>,
    ids: &indexmap::IndexSet<T>,
    make: fn(Vec<T>) -> Predicate,
) {
    if !ids.is_empty() {
        parts.push(make(ids.iter().copied().collect()));
    }
}
