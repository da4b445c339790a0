//! Process-wide observability for sitegate
//!
//! Logs go to stdout (json when `LOG_FORMAT=json`, human-readable otherwise),
//! spans optionally go to an OTLP collector, and resolution/HTTP metrics are
//! recorded into a Prometheus registry served on `/metrics`.

pub mod metrics;
pub mod tracing_setup;

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "sitegate=info,tower_http=debug";

/// Install the subscriber and, when enabled, the metrics recorder.
///
/// Must be called once, before the first request is served.
pub fn init(config: &TelemetryConfig) -> anyhow::Result<Option<PrometheusHandle>> {
    let prometheus_handle = config
        .metrics_enabled
        .then(metrics::install_prometheus_recorder)
        .transpose()?;
    if prometheus_handle.is_some() {
        metrics::describe_metrics();
    }

    let json = config.log_format.eq_ignore_ascii_case("json");
    let json_layer = json.then(|| fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json_layer)
        .with(text_layer)
        .with(tracing_setup::create_otel_layer(config))
        .init();

    Ok(prometheus_handle)
}
