// src/lib.rs
use anyhow::Result;
use app_state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

// Public exports (visible outside this module)
pub mod domain;
pub mod workflows;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_memory_repository, // ---
    create_noop_metrics,
    create_postgres_repository,
    create_prom_metrics,
    create_repository,
    create_session_store,
    init_database_with_retry,
};

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once; later calls are ignored.
pub fn init_tracing() {
    // ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

/// Build the HTTP router with backends determined by environment variables.
pub async fn create_router() -> Result<Router> {
    // ---
    let config = AppConfig::from_env()?;
    create_router_with_config(&config).await
}

/// Build the HTTP router from an already loaded configuration.
pub async fn create_router_with_config(config: &AppConfig) -> Result<Router> {
    // ---
    let metrics = match config.server.metrics {
        MetricsBackend::Prometheus => create_prom_metrics()?,
        MetricsBackend::Noop => create_noop_metrics()?,
    };

    let repository = create_repository(&config.store).await?;
    let sessions = create_session_store(&config.sessions)?;

    let app_state = AppState::new(metrics, repository, sessions);
    Ok(build_router(app_state))
}

fn build_router(app_state: AppState) -> Router {
    // ---
    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register_submit),
        )
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login_submit),
        )
        .route("/logout", post(handlers::logout))
        .route(
            "/tutorial/{id}",
            get(handlers::view_tutorial).post(handlers::post_comment),
        )
        .route(
            "/new_tutorial",
            get(handlers::new_tutorial_page).post(handlers::create_tutorial),
        )
        .route(
            "/edit_tutorial/{id}",
            get(handlers::edit_tutorial_page).post(handlers::edit_tutorial),
        )
        .route("/like_dislike/{id}", post(handlers::like_dislike))
        .route(
            "/account",
            get(handlers::account_page).post(handlers::update_account),
        )
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            handlers::track_metrics,
        ))
        .fallback(handlers::fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
