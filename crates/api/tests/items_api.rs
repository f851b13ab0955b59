//! HTTP-level tests for the browse API over the in-memory fixture catalog.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use jiraibrary_api::config::ApiConfig;
use jiraibrary_api::db::CatalogBackend;
use jiraibrary_api::fixture;
use jiraibrary_api::state::AppState;
use jiraibrary_facets::MemoryItemRepository;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

const FIXTURE: &str = include_str!("../../../fixtures/catalog.yaml");

fn app() -> Router {
    let config = ApiConfig::from_lookup(|key| match key {
        "JIRAIBRARY_FIXTURE" => Some("fixtures/catalog.yaml".to_string()),
        _ => None,
    })
    .unwrap();
    let snapshot = fixture::parse_yaml(FIXTURE).unwrap();
    let state = AppState::new(
        &config,
        CatalogBackend::Memory(MemoryItemRepository::new(snapshot)),
    );
    jiraibrary_api::app(state)
}

async fn get(uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn slugs(body: &Value) -> Vec<&str> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["slug"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_list_items_shape() {
    let (status, body) = get_json("/items").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result_count"], 3);
    assert_eq!(
        slugs(&body),
        vec!["dream-fantasy-jsk", "country-garden-op", "starry-night-skirt"]
    );
    assert!(body["filters"]["brands"].is_array());
    assert!(body["filters"]["release_years"].is_object());
    assert_eq!(body["selected"]["price_currency"], "USD");
    assert_eq!(body["active_filters"], Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_trailing_slash_route() {
    let (status, body) = get_json("/items/?q=garden").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&body), vec!["country-garden-op"]);
}

#[tokio::test]
async fn test_brand_filter_and_chip() {
    let (status, body) = get_json("/items?brand=baby&limit=5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&body), vec!["country-garden-op"]);
    let chip = &body["active_filters"][0];
    assert_eq!(chip["param"], "brand");
    assert_eq!(chip["value_key"], "baby");
}

#[tokio::test]
async fn test_malformed_params_are_ignored() {
    let (status, body) =
        get_json("/items?limit=lots&release_year_range=soon&price_range=cheap&bust_min=x").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result_count"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, body) = get_json("/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not found: /nope");
}

#[tokio::test]
async fn test_health_endpoints() {
    let (status, _, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let (status, _, _) = get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_header() {
    let (_, headers, _) = get("/items").await;
    let request_id = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(!request_id.is_empty());

    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
}
