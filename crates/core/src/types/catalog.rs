//! Catalog reference records and the denormalized item record.
//!
//! These are read-only views of data owned by the catalog management side.
//! A [`CatalogSnapshot`] bundles everything needed to browse the catalog and
//! is the on-disk fixture format (YAML or JSON).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{
    BrandId, CategoryId, CollectionId, ColorId, FabricId, FeatureId, ItemId, StyleId,
    SubcategoryId, SubstyleId, TagId,
};
use super::measurement::Measurement;
use super::price::Price;
use super::status::{CollectionSeason, FeatureCategory, ItemStatus, TagType};

/// A fashion brand. Addressed by slug in URLs and filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub slug: String,
    /// Localized names keyed by language code (plus an optional `default`).
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    /// ISO 3166 alpha-2 country code.
    #[serde(default)]
    pub country: Option<String>,
}

impl Brand {
    /// The most appropriate human-readable brand name.
    ///
    /// Prefers English, then the `default` entry, then any non-empty name, and
    /// finally derives one from the slug.
    #[must_use]
    pub fn display_name(&self) -> String {
        for key in ["en", "default"] {
            if let Some(name) = self.names.get(key).filter(|n| !n.is_empty()) {
                return name.clone();
            }
        }
        if let Some(name) = self.names.values().find(|n| !n.is_empty()) {
            return name.clone();
        }
        title_case_slug(&self.slug)
    }
}

/// `"angelic-pretty"` → `"Angelic Pretty"`.
fn title_case_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub id: StyleId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substyle {
    pub id: SubstyleId,
    pub style_id: StyleId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    #[serde(rename = "type", default)]
    pub tag_type: TagType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: ColorId,
    pub name: String,
    /// `#rrggbb`
    #[serde(default)]
    pub hex_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    pub name: String,
    #[serde(default)]
    pub season: Option<CollectionSeason>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl Collection {
    /// `"2009 Sweet Dreamer"`, or just the name when the year is unknown.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.year.map_or_else(
            || self.name.clone(),
            |year| format!("{year} {}", self.name).trim().to_owned(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fabric {
    pub id: FabricId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub name: String,
    #[serde(default)]
    pub category: FeatureCategory,
}

/// A localized item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTranslation {
    /// Language code (e.g., `en`, `ja`).
    pub language: String,
    pub name: String,
}

/// An item with all of its attribute associations denormalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub slug: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub subcategory_id: Option<SubcategoryId>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub translations: Vec<ItemTranslation>,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    #[serde(default)]
    pub color_ids: Vec<ColorId>,
    #[serde(default)]
    pub substyle_ids: Vec<SubstyleId>,
    #[serde(default)]
    pub fabric_ids: Vec<FabricId>,
    #[serde(default)]
    pub feature_ids: Vec<FeatureId>,
    #[serde(default)]
    pub collection_ids: Vec<CollectionId>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub prices: Vec<Price>,
}

impl CatalogItem {
    /// English translation name, then any translation, then the slug.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.translations
            .iter()
            .find(|t| t.language == "en")
            .or_else(|| self.translations.first())
            .map_or(self.slug.as_str(), |t| t.name.as_str())
    }
}

/// Reference data for every facetable dimension (everything but items).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub styles: Vec<Style>,
    pub substyles: Vec<Substyle>,
    pub tags: Vec<Tag>,
    pub colors: Vec<Color>,
    pub collections: Vec<Collection>,
    pub fabrics: Vec<Fabric>,
    pub features: Vec<Feature>,
}

/// A complete, self-contained copy of the browsable catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub styles: Vec<Style>,
    pub substyles: Vec<Substyle>,
    pub tags: Vec<Tag>,
    pub colors: Vec<Color>,
    pub collections: Vec<Collection>,
    pub fabrics: Vec<Fabric>,
    pub features: Vec<Feature>,
    pub items: Vec<CatalogItem>,
}

impl CatalogSnapshot {
    /// Copy out the reference data.
    #[must_use]
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary {
            brands: self.brands.clone(),
            categories: self.categories.clone(),
            subcategories: self.subcategories.clone(),
            styles: self.styles.clone(),
            substyles: self.substyles.clone(),
            tags: self.tags.clone(),
            colors: self.colors.clone(),
            collections: self.collections.clone(),
            fabrics: self.fabrics.clone(),
            features: self.features.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn brand(slug: &str, names: &[(&str, &str)]) -> Brand {
        Brand {
            id: BrandId::new(uuid::Uuid::new_v4()),
            slug: slug.to_owned(),
            names: names
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            country: None,
        }
    }

    #[test]
    fn test_brand_display_name_prefers_english() {
        let b = brand("baby", &[("ja", "ベイビー"), ("en", "Baby, the Stars Shine Bright")]);
        assert_eq!(b.display_name(), "Baby, the Stars Shine Bright");
    }

    #[test]
    fn test_brand_display_name_falls_back_to_default_then_any() {
        let b = brand("meta", &[("default", "Metamorphose"), ("ja", "メタモルフォーゼ")]);
        assert_eq!(b.display_name(), "Metamorphose");

        let b = brand("meta", &[("en", ""), ("ja", "メタモルフォーゼ")]);
        assert_eq!(b.display_name(), "メタモルフォーゼ");
    }

    #[test]
    fn test_brand_display_name_from_slug() {
        let b = brand("angelic-pretty", &[]);
        assert_eq!(b.display_name(), "Angelic Pretty");
    }

    #[test]
    fn test_collection_label() {
        let mut c = Collection {
            id: CollectionId::new(uuid::Uuid::new_v4()),
            brand_id: None,
            name: "Sweet Dreamer".to_owned(),
            season: None,
            year: Some(2009),
        };
        assert_eq!(c.display_label(), "2009 Sweet Dreamer");
        c.year = None;
        assert_eq!(c.display_label(), "Sweet Dreamer");
    }

    #[test]
    fn test_snapshot_yaml_defaults() {
        let yaml = r"
brands:
  - id: 0b0e7a52-7a5e-4f57-9d4b-3c2b9f1d1a01
    slug: liz-lisa
items:
  - id: 7c1f7f7e-2b8a-4a8f-8d7c-0f5f0d7f3b10
    slug: liz-lisa-op-01
    status: published
    release_year: 2012
";
        let snapshot: CatalogSnapshot = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(snapshot.brands.len(), 1);
        let item = snapshot.items.first().unwrap();
        assert!(item.status.is_published());
        assert!(item.tag_ids.is_empty());
        assert_eq!(item.display_name(), "liz-lisa-op-01");
    }
}
