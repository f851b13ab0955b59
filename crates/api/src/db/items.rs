//! `PostgreSQL` implementation of [`ItemRepository`].
//!
//! Predicates are rendered into SQL with `sqlx::QueryBuilder`. Every
//! association filter is an `EXISTS` sub-select against the item row, so an
//! item matching through several joined rows is still returned once, and
//! every value is bound rather than interpolated.

use std::collections::{BTreeMap, HashMap};

use jiraibrary_core::{
    Brand, BrandId, Category, CategoryId, Collection, CollectionId, Color, ColorId, CurrencyCode,
    Fabric, FabricId, Feature, FeatureId, ItemId, MeasurementField, Price, PriceSource, Style,
    StyleId, Subcategory, SubcategoryId, Substyle, SubstyleId, Tag, TagId, Vocabulary,
};
use jiraibrary_facets::{
    Bounds, CurrencyPriceStats, FacetDimension, ItemOrder, ItemRepository, ItemSummary, OrderKey,
    Predicate, RepositoryError,
};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

type Names = Json<BTreeMap<String, String>>;

/// Catalog queries against the `catalog` schema.
#[derive(Debug, Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: ItemId,
    slug: String,
    name: String,
    category_id: Option<CategoryId>,
    subcategory_id: Option<SubcategoryId>,
    release_year: Option<i32>,
    brand_id: Option<BrandId>,
    brand_slug: Option<String>,
    brand_names: Option<Names>,
}

#[derive(sqlx::FromRow)]
struct PriceRow {
    item_id: ItemId,
    amount: Decimal,
    currency: String,
    source: String,
}

impl PgItemRepository {
    /// Create a new repository over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn prices_for(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<ItemId, Vec<Price>>, RepositoryError> {
        let rows = sqlx::query_as::<_, PriceRow>(
            r"
            SELECT item_id, amount, currency, source
            FROM catalog.item_price
            WHERE item_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::backend)?;

        let mut prices: HashMap<ItemId, Vec<Price>> = HashMap::new();
        for row in rows {
            let currency = CurrencyCode::parse(&row.currency).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
            })?;
            let source = row.source.parse::<PriceSource>().map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid price source in database: {e}"))
            })?;
            prices
                .entry(row.item_id)
                .or_default()
                .push(Price::new(row.amount, currency).with_source(source));
        }
        Ok(prices)
    }
}

impl ItemRepository for PgItemRepository {
    #[instrument(skip(self), err)]
    async fn vocabulary(&self) -> Result<Vocabulary, RepositoryError> {
        let pool = &self.pool;

        let brands = sqlx::query_as::<_, (BrandId, String, Names, Option<String>)>(
            "SELECT id, slug, names, country FROM catalog.brand ORDER BY slug",
        )
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, slug, names, country)| Brand {
            id,
            slug,
            names: names.0,
            country,
        })
        .collect();

        let categories = sqlx::query_as::<_, (CategoryId, String, String)>(
            "SELECT id, name, slug FROM catalog.category ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, name, slug)| Category { id, name, slug })
        .collect();

        let subcategories = sqlx::query_as::<_, (SubcategoryId, CategoryId, String, String)>(
            "SELECT id, category_id, name, slug FROM catalog.subcategory ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, category_id, name, slug)| Subcategory {
            id,
            category_id,
            name,
            slug,
        })
        .collect();

        let styles = sqlx::query_as::<_, (StyleId, String, String)>(
            "SELECT id, name, slug FROM catalog.style ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, name, slug)| Style { id, name, slug })
        .collect();

        let substyles = sqlx::query_as::<_, (SubstyleId, StyleId, String, String)>(
            "SELECT id, style_id, name, slug FROM catalog.substyle ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, style_id, name, slug)| Substyle {
            id,
            style_id,
            name,
            slug,
        })
        .collect();

        let tags = sqlx::query_as::<_, (TagId, String, String, String)>(
            "SELECT id, name, slug, type FROM catalog.tag ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, name, slug, tag_type)| {
            Ok(Tag {
                id,
                name,
                slug,
                tag_type: tag_type.parse().map_err(RepositoryError::DataCorruption)?,
            })
        })
        .collect::<Result<Vec<_>, RepositoryError>>()?;

        let colors = sqlx::query_as::<_, (ColorId, String, Option<String>)>(
            "SELECT id, name, hex_code FROM catalog.color ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, name, hex_code)| Color { id, name, hex_code })
        .collect();

        let collections = sqlx::query_as::<
            _,
            (CollectionId, Option<BrandId>, String, Option<String>, Option<i32>),
        >("SELECT id, brand_id, name, season, year FROM catalog.collection ORDER BY name")
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, brand_id, name, season, year)| {
            Ok(Collection {
                id,
                brand_id,
                name,
                season: season
                    .map(|s| s.parse())
                    .transpose()
                    .map_err(RepositoryError::DataCorruption)?,
                year,
            })
        })
        .collect::<Result<Vec<_>, RepositoryError>>()?;

        let fabrics = sqlx::query_as::<_, (FabricId, String)>(
            "SELECT id, name FROM catalog.fabric ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, name)| Fabric { id, name })
        .collect();

        let features = sqlx::query_as::<_, (FeatureId, String, String)>(
            "SELECT id, name, category FROM catalog.feature ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(RepositoryError::backend)?
        .into_iter()
        .map(|(id, name, category)| {
            Ok(Feature {
                id,
                name,
                category: category.parse().map_err(RepositoryError::DataCorruption)?,
            })
        })
        .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(Vocabulary {
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
        })
    }

    #[instrument(skip(self, predicate), err)]
    async fn count_published(&self, predicate: &Predicate) -> Result<u64, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM catalog.item i");
        push_published_where(&mut qb, predicate);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::backend)?;
        Ok(to_count(count))
    }

    #[instrument(skip(self, predicate, order), err)]
    async fn list_published(
        &self,
        predicate: &Predicate,
        limit: Option<usize>,
        order: &ItemOrder,
    ) -> Result<Vec<ItemSummary>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r"
            SELECT i.id, i.slug, i.category_id, i.subcategory_id, i.release_year,
                   b.id AS brand_id, b.slug AS brand_slug, b.names AS brand_names,
                   COALESCE(
                       (SELECT t.name FROM catalog.item_translation t
                        WHERE t.item_id = i.id
                        ORDER BY (t.language = 'en') DESC, t.position, t.language
                        LIMIT 1),
                       i.slug
                   ) AS name
            FROM catalog.item i
            LEFT JOIN catalog.brand b ON b.id = i.brand_id",
        );
        push_published_where(&mut qb, predicate);

        qb.push(" ORDER BY ");
        for term in order.terms() {
            let column = match term.key {
                OrderKey::BrandSlug => "b.slug",
                OrderKey::ReleaseYear => "i.release_year",
                OrderKey::CreatedAt => "i.created_at",
            };
            let direction = if term.descending { "DESC" } else { "ASC" };
            qb.push(format!("{column} {direction} NULLS LAST, "));
        }
        qb.push("i.slug ASC");

        if let Some(limit) = limit {
            qb.push(" LIMIT ")
                .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows: Vec<SummaryRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::backend)?;

        let ids = rows.iter().map(|row| row.id.as_uuid()).collect();
        let mut prices = self.prices_for(ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let brand_name = match (row.brand_id, &row.brand_slug) {
                    (Some(id), Some(slug)) => Some(
                        Brand {
                            id,
                            slug: slug.clone(),
                            names: row.brand_names.map(|names| names.0).unwrap_or_default(),
                            country: None,
                        }
                        .display_name(),
                    ),
                    _ => None,
                };
                ItemSummary {
                    prices: prices.remove(&row.id).unwrap_or_default(),
                    slug: row.slug,
                    name: row.name,
                    brand_slug: row.brand_slug,
                    brand_name,
                    category_id: row.category_id,
                    subcategory_id: row.subcategory_id,
                    release_year: row.release_year,
                }
            })
            .collect())
    }

    #[instrument(skip(self, predicate), err)]
    async fn facet_counts(
        &self,
        dimension: FacetDimension,
        predicate: &Predicate,
    ) -> Result<HashMap<String, u64>, RepositoryError> {
        let (join, key) = facet_source(dimension);
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {key} AS key, COUNT(DISTINCT i.id) AS item_count FROM catalog.item i {join}"
        ));
        push_published_where(&mut qb, predicate);
        qb.push(format!(" AND {key} IS NOT NULL GROUP BY {key}"));

        let rows: Vec<(String, i64)> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::backend)?;
        Ok(rows
            .into_iter()
            .map(|(key, count)| (key, to_count(count)))
            .collect())
    }

    #[instrument(skip(self), err)]
    async fn release_year_bounds(&self) -> Result<Bounds<i32>, RepositoryError> {
        let (min, max) = sqlx::query_as::<_, (Option<i32>, Option<i32>)>(
            "SELECT MIN(release_year), MAX(release_year) FROM catalog.item WHERE status = 'published'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::backend)?;
        Ok(Bounds { min, max })
    }

    #[instrument(skip(self), err)]
    async fn measurement_bounds(
        &self,
    ) -> Result<BTreeMap<MeasurementField, Bounds<f64>>, RepositoryError> {
        type Row = (
            Option<f64>,
            Option<f64>,
            Option<f64>,
            Option<f64>,
            Option<f64>,
            Option<f64>,
            Option<f64>,
            Option<f64>,
        );
        let row = sqlx::query_as::<_, Row>(
            r"
            SELECT MIN(m.bust_cm), MAX(m.bust_cm),
                   MIN(m.waist_cm), MAX(m.waist_cm),
                   MIN(m.hip_cm), MAX(m.hip_cm),
                   MIN(m.length_cm), MAX(m.length_cm)
            FROM catalog.item_measurement m
            JOIN catalog.item i ON i.id = m.item_id
            WHERE i.status = 'published'
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::backend)?;

        let pairs = [
            (MeasurementField::Bust, row.0, row.1),
            (MeasurementField::Waist, row.2, row.3),
            (MeasurementField::Hip, row.4, row.5),
            (MeasurementField::Length, row.6, row.7),
        ];
        Ok(pairs
            .into_iter()
            .filter(|(_, min, max)| min.is_some() || max.is_some())
            .map(|(field, min, max)| (field, Bounds { min, max }))
            .collect())
    }

    #[instrument(skip(self), err)]
    async fn price_stats(&self) -> Result<Vec<CurrencyPriceStats>, RepositoryError> {
        let rows = sqlx::query_as::<_, (String, i64, Decimal, Decimal)>(
            r"
            SELECT p.currency, COUNT(DISTINCT p.item_id), MIN(p.amount), MAX(p.amount)
            FROM catalog.item_price p
            JOIN catalog.item i ON i.id = p.item_id
            WHERE i.status = 'published'
            GROUP BY p.currency
            ORDER BY p.currency
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::backend)?;

        rows.into_iter()
            .map(|(currency, item_count, min, max)| {
                let currency = CurrencyCode::parse(&currency).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
                })?;
                Ok(CurrencyPriceStats {
                    currency,
                    item_count: to_count(item_count),
                    min,
                    max,
                })
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))
    }
}

fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

fn uuids<T: Copy + Into<Uuid>>(ids: &[T]) -> Vec<Uuid> {
    ids.iter().map(|id| (*id).into()).collect()
}

/// `(join clause, text key expression)` for one facet dimension.
const fn facet_source(dimension: FacetDimension) -> (&'static str, &'static str) {
    match dimension {
        FacetDimension::Brand => ("JOIN catalog.brand f ON f.id = i.brand_id", "f.slug"),
        FacetDimension::Category => ("", "i.category_id::text"),
        FacetDimension::Subcategory => ("", "i.subcategory_id::text"),
        FacetDimension::Style => (
            "JOIN catalog.item_substyle fl ON fl.item_id = i.id \
             JOIN catalog.substyle f ON f.id = fl.substyle_id",
            "f.style_id::text",
        ),
        FacetDimension::Substyle => (
            "JOIN catalog.item_substyle fl ON fl.item_id = i.id",
            "fl.substyle_id::text",
        ),
        FacetDimension::Tag => (
            "JOIN catalog.item_tag fl ON fl.item_id = i.id",
            "fl.tag_id::text",
        ),
        FacetDimension::Color => (
            "JOIN catalog.item_color fl ON fl.item_id = i.id",
            "fl.color_id::text",
        ),
        FacetDimension::Collection => (
            "JOIN catalog.item_collection fl ON fl.item_id = i.id",
            "fl.collection_id::text",
        ),
        FacetDimension::Fabric => (
            "JOIN catalog.item_fabric fl ON fl.item_id = i.id",
            "fl.fabric_id::text",
        ),
        FacetDimension::Feature => (
            "JOIN catalog.item_feature fl ON fl.item_id = i.id",
            "fl.feature_id::text",
        ),
    }
}

const fn measurement_column(field: MeasurementField) -> &'static str {
    match field {
        MeasurementField::Bust => "bust_cm",
        MeasurementField::Waist => "waist_cm",
        MeasurementField::Hip => "hip_cm",
        MeasurementField::Length => "length_cm",
    }
}

/// Escape `LIKE` wildcards so the search text matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_published_where(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    qb.push(" WHERE i.status = 'published'");
    if !predicate.is_true() {
        qb.push(" AND ");
        push_predicate(qb, predicate);
    }
}

fn push_joined(
    qb: &mut QueryBuilder<'_, Postgres>,
    parts: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if parts.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_predicate(qb, part);
    }
    qb.push(")");
}

fn push_link(qb: &mut QueryBuilder<'_, Postgres>, table: &str, column: &str, ids: Vec<Uuid>) {
    qb.push(format!(
        "EXISTS (SELECT 1 FROM catalog.{table} pl WHERE pl.item_id = i.id AND pl.{column} = ANY("
    ))
    .push_bind(ids)
    .push("))");
}

/// Render `predicate` as a boolean SQL expression over the item alias `i`.
fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::True => {
            qb.push("TRUE");
        }
        Predicate::And(parts) => push_joined(qb, parts, " AND ", "TRUE"),
        Predicate::Or(parts) => push_joined(qb, parts, " OR ", "FALSE"),
        Predicate::Brand(slugs) => {
            qb.push(
                "EXISTS (SELECT 1 FROM catalog.brand pb \
                 WHERE pb.id = i.brand_id AND lower(pb.slug) = ANY(",
            )
            .push_bind(slugs.clone())
            .push("))");
        }
        Predicate::Category(ids) => {
            qb.push("i.category_id = ANY(").push_bind(uuids(ids)).push(")");
        }
        Predicate::Subcategory(ids) => {
            qb.push("i.subcategory_id = ANY(")
                .push_bind(uuids(ids))
                .push(")");
        }
        Predicate::Style(ids) => {
            qb.push(
                "EXISTS (SELECT 1 FROM catalog.item_substyle pis \
                 JOIN catalog.substyle ps ON ps.id = pis.substyle_id \
                 WHERE pis.item_id = i.id AND ps.style_id = ANY(",
            )
            .push_bind(uuids(ids))
            .push("))");
        }
        Predicate::Substyle(ids) => push_link(qb, "item_substyle", "substyle_id", uuids(ids)),
        Predicate::Tag(ids) => push_link(qb, "item_tag", "tag_id", uuids(ids)),
        Predicate::Color(ids) => push_link(qb, "item_color", "color_id", uuids(ids)),
        Predicate::Collection(ids) => {
            push_link(qb, "item_collection", "collection_id", uuids(ids));
        }
        Predicate::Fabric(ids) => push_link(qb, "item_fabric", "fabric_id", uuids(ids)),
        Predicate::Feature(ids) => push_link(qb, "item_feature", "feature_id", uuids(ids)),
        Predicate::ReleaseYear { min, max } => {
            qb.push("(i.release_year IS NOT NULL");
            if let Some(min) = min {
                qb.push(" AND i.release_year >= ").push_bind(*min);
            }
            if let Some(max) = max {
                qb.push(" AND i.release_year <= ").push_bind(*max);
            }
            qb.push(")");
        }
        Predicate::Price { currency, min, max } => {
            qb.push(
                "EXISTS (SELECT 1 FROM catalog.item_price pp \
                 WHERE pp.item_id = i.id AND pp.currency = ",
            )
            .push_bind(currency.as_str().to_owned());
            if let Some(min) = min {
                qb.push(" AND pp.amount >= ").push_bind(*min);
            }
            if let Some(max) = max {
                qb.push(" AND pp.amount <= ").push_bind(*max);
            }
            qb.push(")");
        }
        Predicate::Measurement(ranges) => {
            qb.push("EXISTS (SELECT 1 FROM catalog.item_measurement pm WHERE pm.item_id = i.id");
            for range in ranges {
                let column = measurement_column(range.field);
                qb.push(format!(" AND pm.{column} IS NOT NULL"));
                if let Some(min) = range.min {
                    qb.push(format!(" AND pm.{column} >= ")).push_bind(min);
                }
                if let Some(max) = range.max {
                    qb.push(format!(" AND pm.{column} <= ")).push_bind(max);
                }
            }
            qb.push(")");
        }
        Predicate::Text(q) => {
            let pattern = format!("%{}%", escape_like(q));
            qb.push("(i.slug ILIKE ")
                .push_bind(pattern.clone())
                .push(
                    " OR EXISTS (SELECT 1 FROM catalog.brand tb \
                     WHERE tb.id = i.brand_id AND tb.slug ILIKE ",
                )
                .push_bind(pattern.clone())
                .push(
                    ") OR EXISTS (SELECT 1 FROM catalog.item_translation tt \
                     WHERE tt.item_id = i.id AND tt.name ILIKE ",
                )
                .push_bind(pattern)
                .push("))");
        }
    }
}
