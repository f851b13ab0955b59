//! Catalog snapshot files.
//!
//! A snapshot is a YAML (or, by `.json` extension, JSON) document holding a
//! complete [`CatalogSnapshot`]. See `fixtures/catalog.yaml`.

use std::path::Path;

use jiraibrary_core::CatalogSnapshot;
use thiserror::Error;

/// Errors that can occur while loading a snapshot file.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read and parse a snapshot file.
///
/// # Errors
///
/// Returns `FixtureError` if the file cannot be read or parsed.
pub async fn load_snapshot(path: &Path) -> Result<CatalogSnapshot, FixtureError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let snapshot = if is_json {
        parse_json(&content)?
    } else {
        parse_yaml(&content)?
    };

    tracing::info!(
        path = %path.display(),
        brands = snapshot.brands.len(),
        items = snapshot.items.len(),
        "Loaded catalog snapshot"
    );
    Ok(snapshot)
}

/// Parse a YAML snapshot.
///
/// # Errors
///
/// Returns `FixtureError::Yaml` if the document is not a valid snapshot.
pub fn parse_yaml(content: &str) -> Result<CatalogSnapshot, FixtureError> {
    Ok(serde_yaml::from_str(content)?)
}

fn parse_json(content: &str) -> Result<CatalogSnapshot, FixtureError> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml() {
        let snapshot = parse_yaml(
            r"
brands:
  - id: 00000000-0000-0000-000a-000000000001
    slug: angelic-pretty
items: []
",
        )
        .unwrap();
        assert_eq!(snapshot.brands.first().unwrap().slug, "angelic-pretty");
    }

    #[test]
    fn test_parse_json() {
        let snapshot = parse_json(
            r#"{"items": [{"id": "00000000-0000-0000-0001-000000000001", "slug": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.items.len(), 1);
    }

    #[test]
    fn test_rejects_bad_ids() {
        let err = parse_yaml("brands:\n  - id: nope\n    slug: x\n").unwrap_err();
        assert!(matches!(err, FixtureError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_snapshot(Path::new("/nonexistent/catalog.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
