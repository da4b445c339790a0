//! Prometheus metrics setup and metric definitions

use anyhow::Context;
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    // Prometheus defaults plus sub-millisecond buckets; most resolutions are
    // a couple of indexed lookups.
    let buckets = [
        0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions so `/metrics` carries HELP/TYPE lines from
/// startup, not just after first use.
pub fn describe_metrics() {
    describe_counter!("sitegate_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "sitegate_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "sitegate_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    describe_counter!(
        "sitegate_domain_resolutions_total",
        "Host resolutions by winning strategy (or unresolved)"
    );
    describe_histogram!(
        "sitegate_domain_resolution_duration_seconds",
        "Host resolution duration in seconds"
    );
}
