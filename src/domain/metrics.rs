use super::models::Reaction;
use std::sync::Arc;
use std::time::Instant;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record a completed registration.
    fn record_user_registered(&self);

    /// Record a login attempt and whether it succeeded.
    fn record_login(&self, success: bool);

    /// Record a newly created tutorial.
    fn record_tutorial_created(&self);

    /// Record a newly posted comment.
    fn record_comment_created(&self);

    /// Record a like or dislike.
    fn record_reaction(&self, action: Reaction);

    /// Record HTTP request duration and labels.
    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
