//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` holds the store,
//! the session backend and the metrics implementation.
//!
//! The state is cheaply cloneable (every field is an `Arc`) so it can be
//! handed to each request without copying resources.

use crate::domain::{MetricsPtr, Repository, RepositoryPtr, SessionStore, SessionStorePtr};

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the application.
/// Handlers depend on the `Repository` and `SessionStore` abstractions and
/// hand them explicitly to the workflow functions.
///
/// # Lifecycle
///
/// 1. Created once in `create_router_with_config()` during application startup
/// 2. Attached to the Axum router via `.with_state(app_state)`
/// 3. Cloned automatically by Axum for each incoming HTTP request
/// 4. Handlers extract via `State(state): State<AppState>`
#[derive(Clone)]
pub(crate) struct AppState {
    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing/development).
    metrics: MetricsPtr,

    /// Persistent storage for users, tutorials, comments and reactions.
    repository: RepositoryPtr,

    /// Session token storage (Redis or in-memory).
    sessions: SessionStorePtr,
}

impl AppState {
    // ---

    pub fn new(metrics: MetricsPtr, repository: RepositoryPtr, sessions: SessionStorePtr) -> Self {
        // ---
        AppState {
            metrics,
            repository,
            sessions,
        }
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get the repository as a trait object for workflow calls.
    pub(crate) fn repository(&self) -> &dyn Repository {
        // ---
        self.repository.as_ref()
    }

    /// Get the session store as a trait object for workflow calls.
    pub(crate) fn sessions(&self) -> &dyn SessionStore {
        // ---
        self.sessions.as_ref()
    }
}
