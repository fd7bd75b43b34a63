//! Integration tests for the ingress router: built-in endpoints and middleware.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceExt;
use utoipa::OpenApi;

use api_ingress::{ApiIngress, ApiIngressConfig};

#[derive(OpenApi)]
#[openapi(info(title = "ingress-test", version = "0.0.1"))]
struct EmptyDoc;

fn module_routes() -> Router {
    Router::new()
        .route("/api/ping", get(|| async { "pong" }))
        .route("/api/echo", post(|body: String| async move { body }))
        .route(
            "/api/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        )
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let router = ApiIngress::new(ApiIngressConfig::default()).build_router(module_routes());

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn module_routes_are_merged() {
    let router = ApiIngress::new(ApiIngressConfig::default()).build_router(module_routes());

    let response = router
        .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"pong");
}

#[tokio::test]
async fn openapi_served_when_docs_enabled() {
    let ingress = ApiIngress::new(ApiIngressConfig::default())
        .with_openapi(&EmptyDoc::openapi())
        .unwrap();
    let router = ingress.build_router(module_routes());

    let response = router
        .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "ingress-test");
}

#[tokio::test]
async fn openapi_hidden_when_docs_disabled() {
    let config = ApiIngressConfig {
        enable_docs: false,
        ..Default::default()
    };
    let ingress = ApiIngress::new(config)
        .with_openapi(&EmptyDoc::openapi())
        .unwrap();
    let router = ingress.build_router(module_routes());

    let response = router
        .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ApiIngressConfig {
        body_limit_bytes: 8,
        ..Default::default()
    };
    let router = ApiIngress::new(config).build_router(module_routes());

    let response = router
        .oneshot(
            Request::post("/api/echo")
                .header("content-length", "32")
                .body(Body::from(vec![b'x'; 32]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn request_id_is_generated_for_every_response() {
    let router = ApiIngress::new(ApiIngressConfig::default()).build_router(module_routes());

    let first = router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let second = router
        .oneshot(Request::get("/api/missing").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    let id = |r: &axum::response::Response| {
        r.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    let (a, b) = (id(&first), id(&second));
    assert!(a.as_deref().is_some_and(|v| v.len() == 21), "nanoid expected: {a:?}");
    assert!(b.is_some());
    assert_ne!(a, b);
}

#[tokio::test]
async fn slow_handler_times_out_with_408() {
    let config = ApiIngressConfig {
        request_timeout_sec: 1,
        ..Default::default()
    };
    let router = ApiIngress::new(config).build_router(module_routes());

    let response = router
        .oneshot(Request::get("/api/slow").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(response.headers().get("x-request-id").is_some());
}
