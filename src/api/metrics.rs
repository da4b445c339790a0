//! Scrape endpoint for the resolution and HTTP metrics

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// GET /metrics. `None` when `METRICS_ENABLED` is off.
pub async fn metrics_handler(State(handle): State<Option<PrometheusHandle>>) -> Response {
    let Some(handle) = handle else {
        return (StatusCode::NOT_FOUND, "Metrics not enabled").into_response();
    };
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        handle.render(),
    )
        .into_response()
}
