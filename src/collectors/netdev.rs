//! Network interface statistics collector.
//!
//! This module reads `/proc/<pid>/net/dev` and splits it into a table of raw
//! counter values per interface. The file looks like:
//!
//! ```text
//! Inter-|   Receive                                                |  Transmit
//!  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
//!     lo: 2776770   11307    0    0    0     0          0         0  2776770   11307    0    0    0     0       0          0
//! ```
//!
//! Column names are taken from the receive half of the second header line and
//! are not hardcoded; each one yields a `receive_<name>` and a
//! `transmit_<name>` entry. Values stay as the kernel printed them.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

use crate::error::NetDevError;
use crate::filter::DeviceFilter;
use crate::procfs::open_netdev;

/// Raw counters of a single interface, keyed by metric name (`receive_bytes`, ...).
pub type DeviceCounters = HashMap<String, String>;

/// Network interface statistics: interface name to its raw counters.
pub type NetDevStats = HashMap<String, DeviceCounters>;

/// Separates the interface name from its values and the values from each other.
static FIELD_SEP: Lazy<Regex> =
    Lazy::new(|| Regex::new("[ :] *").expect("net/dev field separator is a valid regex"));

/// Interface names may hold arbitrary bytes; invalid UTF-8 is replaced
/// rather than treated as a read failure.
fn decode_line(raw: Vec<u8>) -> String {
    let mut line = match String::from_utf8(raw) {
        Ok(line) => line,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    if line.ends_with('\r') {
        line.pop();
    }
    line
}

/// Reads network interface statistics of `pid` (or the calling process when
/// `pid` is `self` or empty) below `procfs_root`.
///
/// The file is opened and closed within this call.
pub fn get_netdev_stats<F>(
    procfs_root: impl AsRef<Path>,
    pid: &str,
    ignore: &F,
) -> Result<NetDevStats, NetDevError>
where
    F: DeviceFilter + ?Sized,
{
    let reader = open_netdev(procfs_root, pid)?;
    parse_netdev_stats(reader, ignore)
}

/// Parses net/dev content.
///
/// Devices matched by `ignore` are left out. Any malformed header or data
/// line aborts the parse; no partial table is returned.
pub fn parse_netdev_stats<R, F>(reader: R, ignore: &F) -> Result<NetDevStats, NetDevError>
where
    R: BufRead,
    F: DeviceFilter + ?Sized,
{
    let mut lines = reader.split(b'\n').map(|raw| raw.map(decode_line));

    // First line is a title ("Inter-| Receive | Transmit"), skip it whatever it says.
    lines.next().transpose()?;

    let header_line = lines.next().transpose()?.unwrap_or_default();
    let parts: Vec<&str> = header_line.split('|').collect();
    if parts.len() != 3 {
        // interface + receive + transmit
        return Err(NetDevError::InvalidHeader(header_line));
    }

    let header: Vec<&str> = parts[1].split_whitespace().collect();
    let mut stats = NetDevStats::new();

    for line in lines {
        let line = line?;
        let fields: Vec<&str> = FIELD_SEP.split(line.trim_start()).collect();
        if fields.len() != 2 * header.len() + 1 {
            return Err(NetDevError::InvalidLine(line));
        }

        let device = fields[0];
        if ignore.matches(device) {
            debug!("Ignoring device: {}", device);
            continue;
        }

        let mut counters = DeviceCounters::with_capacity(2 * header.len());
        for (i, name) in header.iter().enumerate() {
            counters.insert(format!("receive_{name}"), fields[i + 1].to_string());
            counters.insert(
                format!("transmit_{name}"),
                fields[i + 1 + header.len()].to_string(),
            );
        }

        stats.insert(device.to_string(), counters);
    }

    Ok(stats)
}
