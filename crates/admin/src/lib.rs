//! Furniture Estimator catalog API library.
//!
//! This crate provides the catalog server as a library, allowing it to be
//! tested in-process and reused by the CLI for seeding.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - Flat JSON file as the catalog store ([`db::FurnitureRepository`])
//! - Sentry for server errors, `tracing` for everything else

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::Method;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use config::AdminConfig;
pub use state::AppState;

/// Build the application router with request tracing and CORS.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                status = tracing::field::Empty,
                latency_ms = tracing::field::Empty,
            )
        })
        .on_response(
            |response: &axum::http::Response<_>, latency: std::time::Duration, span: &Span| {
                span.record("status", response.status().as_u16());
                span.record(
                    "latency_ms",
                    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                );
                DefaultOnResponse::default().on_response(response, latency, span);
            },
        );

    routes::routes()
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("furniture.json");
        let config = AdminConfig::from_lookup(|key| {
            (key == "ADMIN_DATA_FILE").then(|| file.display().to_string())
        })
        .unwrap();
        (dir, app(AppState::new(config)))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, app) = test_app();
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("ok".to_string()));

        let (status, _) = send(&app, get("/health/ready")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_list_get_delete() {
        let (_dir, app) = test_app();

        let (status, created) = send(
            &app,
            post_json(
                "/api/furniture",
                &json!({
                    "name": "Luxury Teak Sofa",
                    "category": "sofa",
                    "material": "teak",
                    "dimensions": {"width": 84, "height": 36, "depth": 36},
                    "finish": "lacquered",
                    "color": "natural",
                    "price": 125000,
                    "stock": 5,
                    "status": "Active"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert!(created["created_at"].is_string());

        let (status, listed) = send(&app, get("/api/furniture")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, fetched) = send(&app, get(&format!("/api/furniture/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["dimensions"]["width"], 84);

        let delete = Request::delete(format!("/api/furniture/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, get(&format!("/api/furniture/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().starts_with("Not found"));
    }

    #[tokio::test]
    async fn test_status_filter() {
        let (_dir, app) = test_app();
        for (name, status) in [("A", "Active"), ("B", "Draft")] {
            let body = json!({"name": name, "category": "table", "material": "oak", "status": status});
            send(&app, post_json("/api/furniture", &body)).await;
        }

        let (_, active) = send(&app, get("/api/furniture?status=Active")).await;
        let active = active.as_array().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0]["name"], "A");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let (_dir, app) = test_app();
        let (status, body) = send(
            &app,
            post_json("/api/furniture", &json!({"name": "Chair", "category": "chair"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad request: material is required");
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let (_dir, app) = test_app();
        let request = Request::post("/api/furniture")
            .header("content-type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request() {
        let (_dir, app) = test_app();
        let (status, _) = send(&app, get("/api/furniture/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let (_dir, app) = test_app();
        let request = Request::delete(format!("/api/furniture/{}", uuid::Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
