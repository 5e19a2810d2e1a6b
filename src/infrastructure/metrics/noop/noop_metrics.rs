use crate::domain::{Metrics, Reaction};
use std::time::Instant;

/// No-op metrics implementation for testing.
pub struct NoopMetrics;

impl NoopMetrics {
    pub fn new() -> Self {
        NoopMetrics
    }
}

impl Metrics for NoopMetrics {
    // ---
    fn render(&self) -> String {
        String::new()
    }
    fn record_user_registered(&self) {}
    fn record_login(&self, _: bool) {}
    fn record_tutorial_created(&self) {}
    fn record_comment_created(&self) {}
    fn record_reaction(&self, _: Reaction) {}
    fn record_http_request(&self, _: Instant, _: &str, _: &str, _: u16) {}
}
