use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tower_http::request_id::RequestId;
use tracing::{Instrument, info, info_span};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Id assigned by `SetRequestIdLayer`, or the caller's header if it was kept.
fn request_id_of(req: &Request<Body>) -> String {
    req.extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .or_else(|| {
            req.headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|h| h.to_str().ok())
        })
        .unwrap_or("unknown")
        .to_string()
}

/// Runs the request inside a span carrying its id and logs status and latency.
///
/// Sits inside `SetRequestIdLayer`, so the id is already on the request.
pub async fn request_span(req: Request<Body>, next: Next) -> Response {
    let id = request_id_of(&req);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let span = info_span!("request", request_id = %id, %method, %path);
    let res = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = res.status().as_u16(),
            latency_ms = started.elapsed().as_millis(),
            "request completed"
        )
    });

    res
}
