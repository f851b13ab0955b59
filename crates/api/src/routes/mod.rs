//! HTTP route handlers.
//!
//! # Routes
//!
//! - `GET /health` - Liveness check
//! - `GET /health/ready` - Readiness check (catalog backend reachable)
//! - `GET /items` (and `/items/`) - Faceted item browse

pub mod health;
pub mod items;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/items", get(items::list))
        .route("/items/", get(items::list))
        .fallback(items::not_found)
}
