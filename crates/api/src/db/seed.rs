//! Load a [`CatalogSnapshot`] into the `catalog` schema.
//!
//! Rows are upserted by id inside one transaction, and each item's
//! associations are replaced wholesale, so re-running a seed is idempotent.

use jiraibrary_core::{CatalogItem, CatalogSnapshot};
use jiraibrary_facets::RepositoryError;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Row counts written by [`import_snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Reference rows (brands, categories, tags, ...).
    pub vocabulary: usize,
    pub items: usize,
}

/// Upsert every record of `snapshot`.
///
/// # Errors
///
/// Returns `RepositoryError::Backend` if any statement fails; nothing is
/// committed in that case.
#[tracing::instrument(skip_all, fields(items = snapshot.items.len()))]
pub async fn import_snapshot(
    pool: &PgPool,
    snapshot: &CatalogSnapshot,
) -> Result<SeedSummary, RepositoryError> {
    let mut tx = pool.begin().await.map_err(RepositoryError::backend)?;
    let mut summary = SeedSummary::default();

    for brand in &snapshot.brands {
        sqlx::query(
            r"
            INSERT INTO catalog.brand (id, slug, names, country)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET slug = EXCLUDED.slug, names = EXCLUDED.names, country = EXCLUDED.country
            ",
        )
        .bind(brand.id)
        .bind(&brand.slug)
        .bind(Json(&brand.names))
        .bind(&brand.country)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for category in &snapshot.categories {
        sqlx::query(
            r"
            INSERT INTO catalog.category (id, name, slug) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, slug = EXCLUDED.slug
            ",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for subcategory in &snapshot.subcategories {
        sqlx::query(
            r"
            INSERT INTO catalog.subcategory (id, category_id, name, slug) VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET category_id = EXCLUDED.category_id, name = EXCLUDED.name, slug = EXCLUDED.slug
            ",
        )
        .bind(subcategory.id)
        .bind(subcategory.category_id)
        .bind(&subcategory.name)
        .bind(&subcategory.slug)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for style in &snapshot.styles {
        sqlx::query(
            r"
            INSERT INTO catalog.style (id, name, slug) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, slug = EXCLUDED.slug
            ",
        )
        .bind(style.id)
        .bind(&style.name)
        .bind(&style.slug)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for substyle in &snapshot.substyles {
        sqlx::query(
            r"
            INSERT INTO catalog.substyle (id, style_id, name, slug) VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET style_id = EXCLUDED.style_id, name = EXCLUDED.name, slug = EXCLUDED.slug
            ",
        )
        .bind(substyle.id)
        .bind(substyle.style_id)
        .bind(&substyle.name)
        .bind(&substyle.slug)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for tag in &snapshot.tags {
        sqlx::query(
            r"
            INSERT INTO catalog.tag (id, name, slug, type) VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name, slug = EXCLUDED.slug, type = EXCLUDED.type
            ",
        )
        .bind(tag.id)
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(tag.tag_type.as_str())
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for color in &snapshot.colors {
        sqlx::query(
            r"
            INSERT INTO catalog.color (id, name, hex_code) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, hex_code = EXCLUDED.hex_code
            ",
        )
        .bind(color.id)
        .bind(&color.name)
        .bind(&color.hex_code)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for collection in &snapshot.collections {
        sqlx::query(
            r"
            INSERT INTO catalog.collection (id, brand_id, name, season, year)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET brand_id = EXCLUDED.brand_id, name = EXCLUDED.name,
                season = EXCLUDED.season, year = EXCLUDED.year
            ",
        )
        .bind(collection.id)
        .bind(collection.brand_id)
        .bind(&collection.name)
        .bind(collection.season.map(|s| s.as_str()))
        .bind(collection.year)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for fabric in &snapshot.fabrics {
        sqlx::query(
            r"
            INSERT INTO catalog.fabric (id, name) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
            ",
        )
        .bind(fabric.id)
        .bind(&fabric.name)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for feature in &snapshot.features {
        sqlx::query(
            r"
            INSERT INTO catalog.feature (id, name, category) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, category = EXCLUDED.category
            ",
        )
        .bind(feature.id)
        .bind(&feature.name)
        .bind(feature.category.as_str())
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::backend)?;
        summary.vocabulary += 1;
    }

    for item in &snapshot.items {
        upsert_item(&mut *tx, item).await?;
        summary.items += 1;
    }

    tx.commit().await.map_err(RepositoryError::backend)?;

    tracing::info!(
        vocabulary = summary.vocabulary,
        items = summary.items,
        "Catalog snapshot imported"
    );
    Ok(summary)
}

async fn upsert_item(conn: &mut PgConnection, item: &CatalogItem) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO catalog.item
            (id, slug, status, brand_id, category_id, subcategory_id, release_year, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE
        SET slug = EXCLUDED.slug, status = EXCLUDED.status, brand_id = EXCLUDED.brand_id,
            category_id = EXCLUDED.category_id, subcategory_id = EXCLUDED.subcategory_id,
            release_year = EXCLUDED.release_year, created_at = EXCLUDED.created_at
        ",
    )
    .bind(item.id)
    .bind(&item.slug)
    .bind(item.status.as_str())
    .bind(item.brand_id)
    .bind(item.category_id)
    .bind(item.subcategory_id)
    .bind(item.release_year)
    .bind(item.created_at)
    .execute(&mut *conn)
    .await
    .map_err(RepositoryError::backend)?;

    for table in [
        "item_translation",
        "item_price",
        "item_measurement",
        "item_tag",
        "item_color",
        "item_substyle",
        "item_fabric",
        "item_feature",
        "item_collection",
    ] {
        sqlx::query(&format!("DELETE FROM catalog.{table} WHERE item_id = $1"))
            .bind(item.id)
            .execute(&mut *conn)
            .await
            .map_err(RepositoryError::backend)?;
    }

    for (position, translation) in (0_i32..).zip(&item.translations) {
        sqlx::query(
            r"
            INSERT INTO catalog.item_translation (item_id, language, name, position)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (item_id, language) DO UPDATE SET name = EXCLUDED.name
            ",
        )
        .bind(item.id)
        .bind(&translation.language)
        .bind(&translation.name)
        .bind(position)
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::backend)?;
    }

    for price in &item.prices {
        sqlx::query(
            "INSERT INTO catalog.item_price (item_id, currency, amount, source) VALUES ($1, $2, $3, $4)",
        )
        .bind(item.id)
        .bind(price.currency.as_str())
        .bind(price.amount)
        .bind(price.source.as_str())
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::backend)?;
    }

    for m in &item.measurements {
        sqlx::query(
            r"
            INSERT INTO catalog.item_measurement (item_id, bust_cm, waist_cm, hip_cm, length_cm)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(item.id)
        .bind(m.bust_cm)
        .bind(m.waist_cm)
        .bind(m.hip_cm)
        .bind(m.length_cm)
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::backend)?;
    }

    let links: [(&str, &str, Vec<Uuid>); 6] = [
        ("item_tag", "tag_id", ids(&item.tag_ids)),
        ("item_color", "color_id", ids(&item.color_ids)),
        ("item_substyle", "substyle_id", ids(&item.substyle_ids)),
        ("item_fabric", "fabric_id", ids(&item.fabric_ids)),
        ("item_feature", "feature_id", ids(&item.feature_ids)),
        ("item_collection", "collection_id", ids(&item.collection_ids)),
    ];
    for (table, column, values) in links {
        if values.is_empty() {
            continue;
        }
        sqlx::query(&format!(
            "INSERT INTO catalog.{table} (item_id, {column}) \
             SELECT $1, UNNEST($2::uuid[]) ON CONFLICT DO NOTHING"
        ))
        .bind(item.id)
        .bind(values)
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::backend)?;
    }

    Ok(())
}

fn ids<T: Copy + Into<Uuid>>(values: &[T]) -> Vec<Uuid> {
    values.iter().map(|id| (*id).into()).collect()
}
