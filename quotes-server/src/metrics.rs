//! Prometheus metrics collection for the quote server

use axum::{extract::Request, middleware::Next, response::Response};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Instant;

/// Initialize all metric descriptions
pub fn init_metrics() {
    describe_counter!("quotes_http_requests_total", "Total number of HTTP requests");
    describe_counter!("quotes_errors_total", "Total number of error responses");
    describe_histogram!(
        "quotes_http_request_latency_seconds",
        "HTTP request latency in seconds"
    );
    describe_gauge!("quotes_stored_count", "Number of quotes in the store");
}

/// Record a finished HTTP request
pub fn record_request(method: &str, status: u16, latency_seconds: f64) {
    counter!(
        "quotes_http_requests_total",
        1,
        "method" => method.to_string(),
        "status" => status.to_string()
    );
    histogram!(
        "quotes_http_request_latency_seconds",
        latency_seconds,
        "method" => method.to_string()
    );
}

/// Record an error response
pub fn record_error(error_type: &str) {
    counter!("quotes_errors_total", 1, "type" => error_type.to_string());
}

/// Update the stored quote gauge
pub fn update_quote_count(count: usize) {
    gauge!("quotes_stored_count", count as f64);
}

/// Middleware recording count and latency of every request
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    record_request(
        method.as_str(),
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

/// Storage for Prometheus handle
static PROMETHEUS_HANDLE: std::sync::OnceLock<metrics_exporter_prometheus::PrometheusHandle> =
    std::sync::OnceLock::new();

/// Initialize Prometheus exporter and store its handle
pub fn init_prometheus() -> anyhow::Result<()> {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let handle = builder.install_recorder()?;
    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("Failed to set Prometheus handle"))?;
    Ok(())
}

/// Get Prometheus metrics string
pub fn get_prometheus_metrics() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Prometheus metrics not initialized\n".to_string())
}
