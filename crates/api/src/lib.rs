//! Jiraibrary API library.
//!
//! This crate provides the browse service as a library, allowing it to be
//! tested and reused by the CLI.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - `PostgreSQL` repository, seeding, and connection pool
//! - [`fixture`] - YAML/JSON catalog snapshot loading
//! - [`catalog`] - Browse service with response caching
//! - [`routes`] - HTTP handlers
//! - [`middleware`] - Request ID middleware
//! - [`error`] - `AppError` with Sentry capture

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod fixture;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the application router with tracing, request IDs and CORS.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS]);

    routes::routes()
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
}
