use crate::app_state::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;

/// Handler for the `/metrics` endpoint.
///
/// Returns metrics in Prometheus text format for scraping.
/// Uses the metrics implementation from AppState, which could be
/// either Prometheus or no-op depending on configuration.
pub(crate) async fn metrics_handler(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    // ---

    let metrics_text = app_state.metrics().render();

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics_text,
    ))
}

/// Middleware recording count and latency of every request.
///
/// Labels use the route template (`/tutorial/{id}`) rather than the raw
/// path so the label set stays bounded.
pub(crate) async fn track_metrics(State(app_state): State<AppState>, req: Request, next: Next) -> Response {
    // ---
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "<unmatched>".to_string());

    let response = next.run(req).await;

    app_state
        .metrics()
        .record_http_request(start, &path, &method, response.status().as_u16());
    response
}
