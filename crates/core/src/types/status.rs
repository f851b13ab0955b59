//! Status and classification enums for catalog entities.
//!
//! Stored as lower-case text in the database; `Display`/`FromStr` provide the
//! conversion in both directions.

use serde::{Deserialize, Serialize};

/// Publication state of an item. Only published items are browsable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Draft,
    PendingReview,
    Published,
    Archived,
}

impl ItemStatus {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Whether items in this state appear in browse results and facets.
    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending_review" => Ok(Self::PendingReview),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("invalid item status: {s}")),
        }
    }
}

/// Tag classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    Style,
    #[default]
    Detail,
    Material,
    Motif,
    Construction,
}

impl TagType {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Detail => "detail",
            Self::Material => "material",
            Self::Motif => "motif",
            Self::Construction => "construction",
        }
    }
}

impl std::fmt::Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TagType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "style" => Ok(Self::Style),
            "detail" => Ok(Self::Detail),
            "material" => Ok(Self::Material),
            "motif" => Ok(Self::Motif),
            "construction" => Ok(Self::Construction),
            _ => Err(format!("invalid tag type: {s}")),
        }
    }
}

/// Season a collection was released for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionSeason {
    Spring,
    Summer,
    Fall,
    Winter,
    Resort,
}

impl CollectionSeason {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
            Self::Winter => "winter",
            Self::Resort => "resort",
        }
    }
}

impl std::fmt::Display for CollectionSeason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CollectionSeason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "fall" => Ok(Self::Fall),
            "winter" => Ok(Self::Winter),
            "resort" => Ok(Self::Resort),
            _ => Err(format!("invalid collection season: {s}")),
        }
    }
}

/// Grouping for garment features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    #[default]
    Construction,
    Accessory,
    Trim,
    Attachment,
}

impl FeatureCategory {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::Accessory => "accessory",
            Self::Trim => "trim",
            Self::Attachment => "attachment",
        }
    }
}

impl std::fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "construction" => Ok(Self::Construction),
            "accessory" => Ok(Self::Accessory),
            "trim" => Ok(Self::Trim),
            "attachment" => Ok(Self::Attachment),
            _ => Err(format!("invalid feature category: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status_round_trip() {
        for status in [
            ItemStatus::Draft,
            ItemStatus::PendingReview,
            ItemStatus::Published,
            ItemStatus::Archived,
        ] {
            assert_eq!(status.to_string().parse::<ItemStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_only_published_is_browsable() {
        assert!(ItemStatus::Published.is_published());
        assert!(!ItemStatus::Draft.is_published());
        assert!(!ItemStatus::PendingReview.is_published());
        assert!(!ItemStatus::Archived.is_published());
    }

    #[test]
    fn test_item_status_serde_snake_case() {
        let json = serde_json::to_string(&ItemStatus::PendingReview).unwrap();
        assert_eq!(json, "\"pending_review\"");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!("live".parse::<ItemStatus>().is_err());
        assert!("pattern".parse::<TagType>().is_err());
        assert!("autumn".parse::<CollectionSeason>().is_err());
        assert!("button".parse::<FeatureCategory>().is_err());
    }
}
