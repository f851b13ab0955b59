//! Jiraibrary API - faceted browse over the fashion catalog.
//!
//! This binary serves the item browse endpoint on port 8000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON responses only
//! - `jiraibrary-facets` engine for filtering, facet counts and active filters
//! - `PostgreSQL` catalog (read-only), or an in-memory YAML snapshot when
//!   `JIRAIBRARY_FIXTURE` is set
//! - Short-TTL `moka` cache in front of the engine

#![cfg_attr(not(test), forbid(unsafe_code))]

use jiraibrary_api::config::ApiConfig;
use jiraibrary_api::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start the Sentry client when `SENTRY_DSN` is configured.
///
/// The returned guard flushes pending events on drop.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the global subscriber: env filter, text or JSON output, and the
/// Sentry bridge.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "jiraibrary_api=info,jiraibrary_facets=info,tower_http=debug",
        )
    });

    // Fly.io ships stdout to a log sink that expects one JSON object per line
    let structured = std::env::var_os("FLY_APP_NAME").is_some();
    let json_layer =
        structured.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!structured).then(|| tracing_subscriber::fmt::layer().compact());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = ApiConfig::from_env().expect("invalid API configuration");

    // Sentry before tracing so the subscriber's Sentry layer has a client
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    // Migrations are applied out of band: `jb-cli migrate`
    let addr = config.socket_addr();
    let state = AppState::connect(&config)
        .await
        .expect("failed to open catalog backend");

    let app = jiraibrary_api::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    tracing::info!(%addr, "Jiraibrary API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down, draining in-flight requests");
}
