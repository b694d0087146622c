//! Application state management for the exporter.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use herakles_netdev_exporter::{compile_ignored_devices, NetDevError, NetDevMetrics};
use prometheus::Registry;
use regex::Regex;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::config::Config;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub metrics: NetDevMetrics,
    pub config: Arc<Config>,
    /// Compiled ignored-devices pattern, built once at startup.
    pub ignored_devices: Arc<Regex>,
    /// Outcome of the most recent net/dev scrape.
    pub last_scrape_ok: AtomicBool,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Compiles the device filter and registers the exporter metrics.
    pub fn new(config: Config) -> Result<SharedState, NetDevError> {
        let ignored_devices = Arc::new(compile_ignored_devices(config.netdev_ignored_devices())?);

        let registry = Registry::new();
        let metrics = NetDevMetrics::new(&registry)?;
        debug!("Telemetry metrics registered successfully");

        Ok(Arc::new(Self {
            metrics,
            config: Arc::new(config),
            ignored_devices,
            last_scrape_ok: AtomicBool::new(false),
            start_time: Instant::now(),
        }))
    }
}
