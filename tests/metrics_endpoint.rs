use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serial_test::serial;
use tower::ServiceExt;

// NOTE: Metrics use a global Prometheus recorder and these tests drive
// configuration through the process environment, so they run serially.

async fn router_from_env(metrics_type: &str) -> Router {
    // ---
    std::env::set_var("HUB_STORE", "memory");
    std::env::set_var("HUB_SESSION_STORE", "memory");
    std::env::set_var("HUB_METRICS_TYPE", metrics_type);

    let router = tutorial_hub::create_router()
        .await
        .expect("Should be able to create router");

    std::env::remove_var("HUB_METRICS_TYPE");
    router
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    // ---
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_with_prometheus() {
    // ---
    let app = router_from_env("prom").await;

    // First, hit some endpoints to generate metrics
    get(&app, "/health").await;
    get(&app, "/").await;
    get(&app, "/tutorial/42").await;

    let (status, content_type, body) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));

    assert!(body.contains("http_requests_total"), "got: {body}");
    assert!(body.contains("http_request_duration_seconds"), "got: {body}");

    // Route templates, never raw ids, end up in labels.
    assert!(body.contains(r#"path="/tutorial/{id}""#), "got: {body}");
    assert!(!body.contains("/tutorial/42"), "got: {body}");
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_with_noop() {
    // ---
    let app = router_from_env("noop").await;

    get(&app, "/health").await;

    // Should still return success even with noop metrics
    let (status, _, body) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty(), "noop renders nothing, got: {body}");
}

#[tokio::test]
#[serial]
async fn unknown_metrics_backend_is_a_config_error() {
    // ---
    std::env::set_var("HUB_STORE", "memory");
    std::env::set_var("HUB_SESSION_STORE", "memory");
    std::env::set_var("HUB_METRICS_TYPE", "statsd");

    let result = tutorial_hub::create_router().await;
    std::env::remove_var("HUB_METRICS_TYPE");

    let err = result.expect_err("statsd is not a metrics backend");
    assert!(err.to_string().contains("HUB_METRICS_TYPE"), "got: {err}");
}
