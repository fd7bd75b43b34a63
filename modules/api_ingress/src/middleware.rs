//! Request id generation and the per-request tracing span.

use axum::body::Body;
use axum::http::{HeaderName, Request};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{MakeRequestId, RequestId};
use tower_http::trace::TraceLayer;
use tracing::Span;

pub(crate) const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Generates nanoid request ids for requests that arrive without one.
#[derive(Clone, Copy, Default)]
pub(crate) struct NanoRequestId;

impl MakeRequestId for NanoRequestId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        nanoid::nanoid!().parse().ok().map(RequestId::new)
    }
}

pub(crate) type HttpTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, fn(&Request<Body>) -> Span>;

// Runs inside SetRequestIdLayer, so the id is already in the extensions.
fn http_request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id
    )
}

pub(crate) fn trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http().make_span_with(http_request_span as fn(&Request<Body>) -> Span)
}
