//! Health check endpoint handler.
//!
//! This module provides the `/health` endpoint handler that reports whether
//! the most recent net/dev scrape succeeded.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::atomic::Ordering;
use tracing::{debug, instrument};

use crate::state::SharedState;

const SECONDS_PER_HOUR: f64 = 3600.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Footer text for human-readable HTTP endpoints.
pub const FOOTER_TEXT: &str = "Project: https://github.com/cansp-dev/herakles-netdev-exporter - More info: https://www.herakles.now - Support: exporter@herakles.now";

/// Formats an uptime in seconds as minutes, hours or days.
///
/// Shared by the landing page and `/health`.
pub fn format_uptime(uptime_seconds: u64) -> String {
    let uptime_hours = uptime_seconds as f64 / SECONDS_PER_HOUR;
    if uptime_hours < 1.0 {
        format!("{:.1} minutes", uptime_hours * MINUTES_PER_HOUR)
    } else if uptime_hours < HOURS_PER_DAY {
        format!("{:.1} hours", uptime_hours)
    } else {
        format!("{:.1} days", uptime_hours / HOURS_PER_DAY)
    }
}

/// Handler for the /health endpoint.
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /health request");

    let ok = state.last_scrape_ok.load(Ordering::Relaxed);
    let (status, message) = if ok {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Last net/dev scrape failed")
    };

    let uptime_str = format_uptime(state.start_time.elapsed().as_secs());
    let cfg = &state.config;

    debug!("Health check: {} - {}", status, message);
    (
        status,
        [("Content-Type", "text/plain; charset=utf-8")],
        format!(
            "{message}\n\nUptime: {uptime_str}\nnet/dev PID: {}\nprocfs: {}\nIgnored devices: {}\n\n{FOOTER_TEXT}",
            cfg.netdev_pid(),
            cfg.procfs_path().display(),
            cfg.netdev_ignored_devices(),
        ),
    )
}
