//! Prometheus metrics definitions for herakles-netdev-exporter.
//!
//! The net/dev columns are not known until the file has been read, so one
//! `CounterVec` per metric key is created and registered the first time the
//! key shows up. Every counter carries a single `device` label.
//!
//! An update resets and refills the families under one lock, and
//! [`NetDevMetrics::gather`] takes the same lock, so a gather never observes
//! a half-filled table.

use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, Gauge, Opts, Registry};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use crate::collectors::netdev::NetDevStats;
use crate::error::NetDevError;

/// Prefix of every exported interface counter.
pub const NETWORK_METRIC_PREFIX: &str = "herakles_network";

/// Builds the exported metric name for a net/dev key such as `receive_bytes`.
pub fn metric_name(key: &str) -> String {
    format!("{NETWORK_METRIC_PREFIX}_{key}_total")
}

/// Network interface counters plus scrape telemetry.
pub struct NetDevMetrics {
    registry: Registry,
    families: Mutex<HashMap<String, CounterVec>>,

    // ========== Scrape Telemetry ==========
    pub scrape_duration: Gauge,
    pub scrape_success: Gauge,
    pub devices: Gauge,
}

impl NetDevMetrics {
    /// Creates the telemetry gauges and registers them with the registry.
    pub fn new(registry: &Registry) -> Result<Self, NetDevError> {
        let scrape_duration = Gauge::new(
            "herakles_netdev_scrape_duration_seconds",
            "Time spent reading and parsing net/dev",
        )?;
        let scrape_success = Gauge::new(
            "herakles_netdev_scrape_success",
            "Whether the last net/dev scrape was successful (1) or failed (0)",
        )?;
        let devices = Gauge::new(
            "herakles_netdev_devices",
            "Number of network interfaces exported by the last scrape",
        )?;

        registry.register(Box::new(scrape_duration.clone()))?;
        registry.register(Box::new(scrape_success.clone()))?;
        registry.register(Box::new(devices.clone()))?;

        Ok(Self {
            registry: registry.clone(),
            families: Mutex::new(HashMap::new()),
            scrape_duration,
            scrape_success,
            devices,
        })
    }

    /// Replaces all interface counters with the values in `stats`.
    ///
    /// Values are converted to `f64` up front; if any of them is not a
    /// non-negative number the update fails and no interface counters are
    /// exported until the next successful update.
    pub fn update(&self, stats: &NetDevStats) -> Result<(), NetDevError> {
        let mut families = self
            .families
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Drop children of vanished interfaces (and everything on failure).
        for family in families.values() {
            family.reset();
        }
        self.devices.set(0.0);

        let mut samples = Vec::new();
        for (device, counters) in stats {
            for (key, value) in counters {
                let parsed = value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| NetDevError::InvalidValue {
                        device: device.clone(),
                        metric: key.clone(),
                        value: value.clone(),
                    })?;
                samples.push((device.as_str(), key.as_str(), parsed));
            }
        }

        for (device, key, value) in samples {
            let family = match families.get(key) {
                Some(family) => family.clone(),
                None => {
                    let family = self.register_family(key)?;
                    families.insert(key.to_string(), family.clone());
                    family
                }
            };

            // Counters are cumulative in the kernel; export the absolute value.
            family.with_label_values(&[device]).inc_by(value);
        }

        self.devices.set(stats.len() as f64);
        Ok(())
    }

    /// Gathers the registry while no update is in progress.
    pub fn gather(&self) -> Vec<MetricFamily> {
        let _families = self
            .families
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.registry.gather()
    }

    /// Records outcome and duration of a scrape.
    pub fn record_scrape(&self, success: bool, duration: Duration) {
        self.scrape_success.set(if success { 1.0 } else { 0.0 });
        self.scrape_duration.set(duration.as_secs_f64());
    }

    fn register_family(&self, key: &str) -> Result<CounterVec, NetDevError> {
        let name = metric_name(key);
        let opts = Opts::new(name.clone(), format!("Network device statistic {key}."));
        let family = CounterVec::new(opts, &["device"])?;
        self.registry.register(Box::new(family.clone()))?;
        debug!("Registered metric family {}", name);
        Ok(family)
    }
}
