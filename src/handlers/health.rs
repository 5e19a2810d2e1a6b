use crate::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct HealthQuery {
    mode: Option<String>,
}

/// Responds with the health status of the server.
///
/// - By default (no query parameters), performs a light check to confirm the web server
///   is running.
///
/// - If `mode=full` is passed as a query parameter, also pings the tutorial store and
///   the session store.
///
/// # Responses
/// - `200 OK` with `{ "status": "ok" }` if the server (and both stores, in full mode) are healthy.
/// - `500 INTERNAL SERVER ERROR` with `{ "status": "error" }` if either ping fails in full mode.
///
/// # Examples
/// - `GET /health` → 200 OK
/// - `GET /health?mode=full` → 200 OK or 500 INTERNAL SERVER ERROR
pub(crate) async fn health_check(
    State(state): State<AppState>,
    Query(params): Query<HealthQuery>,
) -> (StatusCode, Json<HealthResponse>) {
    // ---
    match params.mode.as_deref() {
        Some("full") => {
            let store = state.repository().ping().await;
            let sessions = state.sessions().ping().await;

            match store.and(sessions) {
                Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok" })),
                Err(err) => {
                    tracing::error!("Health check failed: {err:#}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(HealthResponse { status: "error" }),
                    )
                }
            }
        }
        _ => (StatusCode::OK, Json(HealthResponse { status: "ok" })),
    }
}
