use metrics::{counter, histogram};
use std::time::Instant;

pub fn increment_users_registered() {
    counter!("users_registered_total").increment(1);
}

pub fn increment_logins(outcome: &'static str) {
    counter!("logins_total", "outcome" => outcome).increment(1);
}

pub fn increment_tutorials_created() {
    counter!("tutorials_created_total").increment(1);
}

pub fn increment_comments_created() {
    counter!("comments_created_total").increment(1);
}

pub fn increment_reactions(action: &'static str) {
    counter!("reactions_total", "action" => action).increment(1);
}

/// Count the request and track its latency using a histogram.
pub fn track_http_request(start: Instant, path: &str, method: &str, status: u16) {
    let status = status.to_string();
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status
    )
    .record(start.elapsed());
}
