//! Prometheus metrics implementation.
//!
//! This module provides a concrete implementation of the `Metrics` trait using
//! the Prometheus metrics format. It delegates to utility functions in sibling
//! modules (`counters.rs`, `recorder.rs`) which handle the actual metrics
//! collection via the global `metrics` crate registry.

use crate::domain::{Metrics, Reaction};
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// Empty because all series live in the global `metrics` registry; the
/// `PrometheusHandle` kept in `recorder.rs` renders them.
pub struct PrometheusMetrics {
    // Empty - uses global metrics registry pattern
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        super::render_metrics()
    }

    fn record_user_registered(&self) {
        tracing::debug!("Recording user registered event");
        super::increment_users_registered();
    }

    fn record_login(&self, success: bool) {
        super::increment_logins(if success { "success" } else { "failure" });
    }

    fn record_tutorial_created(&self) {
        super::increment_tutorials_created();
    }

    fn record_comment_created(&self) {
        super::increment_comments_created();
    }

    fn record_reaction(&self, action: Reaction) {
        super::increment_reactions(action.as_str());
    }

    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16) {
        super::track_http_request(start, path, method, status);
    }
}
