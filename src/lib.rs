//! Herakles Network Device Exporter Library
//!
//! This library reads the kernel's per-interface network counters from
//! `/proc/<pid>/net/dev` and exposes them as Prometheus counters. It is
//! framework-agnostic: the HTTP server lives in the binary, the parsing and
//! exposition logic lives here.
//!
//! # Features
//!
//! - **Namespace Selection**: Read net/dev of any process (`self` by default, `1` for the host)
//! - **Dynamic Columns**: Metric names follow whatever columns the kernel emits
//! - **Interface Exclusion**: Skip interfaces through any [`DeviceFilter`] (usually a regex)
//! - **Prometheus Export**: Convert raw values into labelled counters
//!
//! # Usage
//!
//! ```rust,no_run
//! use herakles_netdev_exporter::{compile_ignored_devices, get_netdev_stats};
//!
//! let ignore = compile_ignored_devices("^lo$").unwrap();
//! let stats = get_netdev_stats("/proc", "self", &ignore).unwrap();
//!
//! for (device, counters) in &stats {
//!     println!("{}: {} rx bytes", device, counters["receive_bytes"]);
//! }
//! ```

pub mod collectors;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod procfs;

// Re-export main types for convenience
pub use collectors::netdev::{get_netdev_stats, parse_netdev_stats, DeviceCounters, NetDevStats};
pub use error::NetDevError;
pub use filter::{compile_ignored_devices, DeviceFilter, DEFAULT_IGNORED_DEVICES};
pub use metrics::NetDevMetrics;
pub use procfs::{locate_netdev, open_netdev, DEFAULT_NETDEV_PID, DEFAULT_PROCFS_PATH};
