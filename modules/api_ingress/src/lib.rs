use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
mod middleware;
mod web;

pub use config::ApiIngressConfig;

/// HTTP ingress: owns the outer router (health, docs, middleware stack)
/// and the listening socket. Feature modules hand it their routes.
pub struct ApiIngress {
    config: ApiIngressConfig,
    openapi: Option<Arc<serde_json::Value>>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            openapi: None,
        }
    }

    /// Attach the OpenAPI document served at `/openapi.json`.
    pub fn with_openapi(mut self, doc: &utoipa::openapi::OpenApi) -> Result<Self> {
        self.openapi = Some(Arc::new(serde_json::to_value(doc)?));
        Ok(self)
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Merge module routes under the ingress endpoints and wrap everything
    /// in the middleware stack.
    pub fn build_router(&self, routes: Router) -> Router {
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(routes);

        if self.config.enable_docs {
            if let Some(doc) = self.openapi.clone() {
                let op_count = doc["paths"].as_object().map_or(0, |p| p.len());
                tracing::info!("Serving OpenAPI document with {op_count} paths");
                router = router
                    .route(
                        "/openapi.json",
                        get(move || {
                            let doc = doc.clone();
                            async move {
                                let json = axum::Json((*doc).clone());
                                ([(header::CACHE_CONTROL, "no-store")], json).into_response()
                            }
                        }),
                    )
                    .route("/docs", get(web::serve_docs));
            }
        }

        // Layers wrap outward: the last one added sees the request first.
        // SetRequestId -> PropagateRequestId -> Trace -> Timeout -> CORS -> BodyLimit -> handler
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router = router
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.config.request_timeout_sec),
            ))
            .layer(middleware::trace_layer())
            .layer(PropagateRequestIdLayer::new(middleware::REQUEST_ID_HEADER))
            .layer(SetRequestIdLayer::new(
                middleware::REQUEST_ID_HEADER,
                middleware::NanoRequestId,
            ));

        router
    }

    /// Bind and serve until `cancel` fires, then drain in-flight requests.
    pub async fn serve(
        &self,
        routes: Router,
        addr: SocketAddr,
        cancel: CancellationToken,
    ) -> Result<()> {
        let router = self.build_router(routes);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", addr);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
