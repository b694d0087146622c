//! Root endpoint handler for the landing page.
//!
//! Plain HTML listing the net/dev source being read and the endpoints that
//! are actually routed.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use std::fmt::Write;
use tracing::{debug, instrument};

use herakles_netdev_exporter::procfs::netdev_path;

use crate::config::Config;
use crate::handlers::health::{format_uptime, FOOTER_TEXT};
use crate::state::SharedState;

/// Routed endpoints with a short description.
fn endpoints(config: &Config) -> Vec<(&'static str, &'static str)> {
    let mut endpoints = vec![("/metrics", "Interface counters in Prometheus text format")];
    if config.enable_health.unwrap_or(true) {
        endpoints.push(("/health", "Outcome of the last net/dev scrape (503 on failure)"));
    }
    endpoints
}

/// Renders the landing page.
fn render_page(config: &Config, uptime: &str) -> String {
    let mut links = String::new();
    for (path, desc) in endpoints(config) {
        let _ = writeln!(links, "<li><a href=\"{path}\">{path}</a> - {desc}</li>");
    }

    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"UTF-8\"><title>Herakles Netdev Exporter</title></head>\n<body>\n\
         <h1>Herakles Netdev Exporter {version}</h1>\n\
         <p>Source: <code>{source}</code><br>Ignored devices: <code>{ignored}</code><br>Uptime: {uptime}</p>\n\
         <ul>\n{links}</ul>\n<p><small>{FOOTER_TEXT}</small></p>\n</body></html>\n",
        version = env!("CARGO_PKG_VERSION"),
        source = netdev_path(config.procfs_path(), config.netdev_pid()).display(),
        ignored = html_escape(config.netdev_ignored_devices()),
    )
}

/// Escapes the characters that would break out of HTML text.
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Handler for the root `/` endpoint.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");

    let uptime = format_uptime(state.start_time.elapsed().as_secs());
    Html(render_page(&state.config, &uptime))
}
