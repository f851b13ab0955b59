//! Item browse endpoint.
//!
//! `GET /items?brand=angelic-pretty&tag=<uuid>&release_year_range=2005:2010`
//!
//! Every parameter is optional and repeatable where it names a list.
//! Unparseable values are ignored rather than rejected, so this endpoint
//! never answers 400.

use axum::Json;
use axum::extract::{RawQuery, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use jiraibrary_facets::QueryParams;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// List published items with facets and active filters.
#[instrument(skip(state, query))]
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> Result<Response> {
    let params = QueryParams::parse(query.as_deref().unwrap_or_default());
    let response = state.catalog().browse(&params).await?;
    Ok(Json(response.as_ref()).into_response())
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
