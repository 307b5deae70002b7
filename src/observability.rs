use std::net::SocketAddr;
use std::time::Instant;

use crate::engine::EngineError;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: engine operations executed. Labels: op, status.
pub const OPERATIONS_TOTAL: &str = "officehours_operations_total";

/// Histogram: operation latency in seconds, lock waits included. Labels: op.
pub const OPERATION_DURATION_SECONDS: &str = "officehours_operation_duration_seconds";

// ── Domain gauges ───────────────────────────────────────────────

/// Gauge: intervals currently published.
pub const INTERVALS_ACTIVE: &str = "officehours_intervals_active";

/// Counter: seats handed out.
pub const RESERVATIONS_TOTAL: &str = "officehours_reservations_total";

/// Counter: seats given back, including those released by deletion.
pub const RELEASES_TOTAL: &str = "officehours_releases_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Record outcome and latency of one engine operation.
pub fn record<T>(op: &'static str, started: Instant, result: &Result<T, EngineError>) {
    let status = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::counter!(OPERATIONS_TOTAL, "op" => op, "status" => status).increment(1);
    metrics::histogram!(OPERATION_DURATION_SECONDS, "op" => op)
        .record(started.elapsed().as_secs_f64());
}
