//! Scrape logic for the metrics exporter.
//!
//! Every call reads net/dev afresh: the file is opened, parsed and closed
//! inside a blocking task, then the parsed table replaces the exported
//! interface counters.

use anyhow::Context;
use herakles_netdev_exporter::get_netdev_stats;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::state::SharedState;

/// Collects net/dev once and updates the interface counters.
///
/// Returns the number of exported devices. Scrape telemetry is recorded for
/// failures as well.
#[instrument(skip(state))]
pub async fn scrape_netdev(state: &SharedState) -> anyhow::Result<usize> {
    let start = Instant::now();
    let result = collect(state).await;

    let success = result.is_ok();
    state.metrics.record_scrape(success, start.elapsed());
    state.last_scrape_ok.store(success, Ordering::Relaxed);

    result
}

async fn collect(state: &SharedState) -> anyhow::Result<usize> {
    let procfs = state.config.procfs_path().to_path_buf();
    let pid = state.config.netdev_pid().to_string();
    let ignored = state.ignored_devices.clone();

    let task_pid = pid.clone();
    let stats =
        tokio::task::spawn_blocking(move || get_netdev_stats(&procfs, &task_pid, &*ignored))
            .await
            .context("net/dev collection task failed")?
            .with_context(|| format!("failed to collect net/dev of pid {}", pid))?;

    state
        .metrics
        .update(&stats)
        .context("failed to export net/dev counters")?;

    debug!("Exported net/dev counters for {} devices", stats.len());
    Ok(stats.len())
}
