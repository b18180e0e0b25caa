//! HTTP request handlers
//!
//! Contains handlers for all HTTP endpoints.

use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{debug, instrument};

use super::AppState;
use crate::exposition::{PrometheusFormatter, CONTENT_TYPE};

/// Header Prometheus sends with the scrape timeout it applies, in seconds
pub const SCRAPE_TIMEOUT_HEADER: &str = "x-prometheus-scrape-timeout-seconds";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    status: String,
    /// Application version
    version: String,
}

/// Root endpoint - redirects to the metrics path
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, state.config.server.path.clone())],
    )
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Scrape deadline from the Prometheus header, if present and sane.
///
/// `offset` is taken off so the response beats the scraper's own timeout;
/// a timeout no larger than the offset is used as is.
fn scrape_deadline_from_headers(headers: &HeaderMap, offset: Duration) -> Option<Duration> {
    let value = headers.get(SCRAPE_TIMEOUT_HEADER)?.to_str().ok()?;
    let seconds: f64 = value.trim().parse().ok()?;
    if seconds <= 0.0 {
        return None;
    }

    let timeout = Duration::try_from_secs_f64(seconds).ok()?;
    match timeout.checked_sub(offset) {
        Some(deadline) if !deadline.is_zero() => Some(deadline),
        _ => Some(timeout),
    }
}

/// Metrics endpoint - runs one scrape cycle and returns Prometheus format
#[instrument(skip(state, headers), name = "metrics_handler")]
pub async fn metrics(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let start = Instant::now();

    let connect = &state.config.connect;
    let deadline = scrape_deadline_from_headers(&headers, connect.timeout_offset())
        .or_else(|| connect.scrape_timeout());

    let outcome = state.collector.collect_within(deadline).await;

    let mut output = PrometheusFormatter::new().format(&outcome.samples);

    // Exporter self metrics
    let scrape_duration = start.elapsed().as_secs_f64();
    output.push_str(&format!(
        r#"# HELP kafka_connect_exporter_info kafka-connect-exporter information
# TYPE kafka_connect_exporter_info gauge
kafka_connect_exporter_info{{version="{}"}} 1
# HELP kafka_connect_exporter_scrape_duration_seconds Time spent scraping Kafka Connect
# TYPE kafka_connect_exporter_scrape_duration_seconds gauge
kafka_connect_exporter_scrape_duration_seconds {}
# HELP kafka_connect_exporter_skipped_connectors Connectors left out of the last scrape
# TYPE kafka_connect_exporter_skipped_connectors gauge
kafka_connect_exporter_skipped_connectors {}
"#,
        env!("CARGO_PKG_VERSION"),
        PrometheusFormatter::format_value(scrape_duration),
        outcome.skipped.len()
    ));

    debug!(
        duration_ms = start.elapsed().as_millis() as u64,
        up = outcome.up,
        samples = outcome.samples.len(),
        skipped = outcome.skipped.len(),
        "Metrics collection complete"
    );

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], output)
}
