use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();

    let handle = builder
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    init_metric_descriptions();

    handle
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "price_suggestions_total",
        "Total number of price suggestions served, by blend method"
    );
    describe_histogram!(
        "price_suggestion_duration_seconds",
        "End-to-end suggestion latency in seconds"
    );
    describe_counter!(
        "market_fetch_failures_total",
        "Market searches that timed out or failed, by reason"
    );
    describe_counter!(
        "moderation_messages_total",
        "Chat messages moderated, by label"
    );
    describe_gauge!(
        "pricer_info",
        "Pricer version and build information"
    );

    // Set service info metric
    gauge!("pricer_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record one served suggestion and its latency
pub fn record_suggestion(method: &str, duration: Duration) {
    counter!(
        "price_suggestions_total",
        "method" => method.to_string(),
    )
    .increment(1);

    histogram!(
        "price_suggestion_duration_seconds",
        "method" => method.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record a degraded market fetch
pub fn record_market_fetch_failure(reason: &str) {
    counter!(
        "market_fetch_failures_total",
        "reason" => reason.to_string(),
    )
    .increment(1);
}

/// Record a moderated chat message
pub fn record_moderation(label: &str) {
    counter!(
        "moderation_messages_total",
        "label" => label.to_string(),
    )
    .increment(1);
}
