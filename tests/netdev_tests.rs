//! Integration tests for net/dev collection.
//!
//! These tests build fake procfs trees with `tempfile` and verify that
//! locating, parsing and exporting behave as a whole.

use herakles_netdev_exporter::{
    compile_ignored_devices, get_netdev_stats, parse_netdev_stats, NetDevError, NetDevMetrics,
};
use prometheus::{Encoder, Registry, TextEncoder};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const NETDEV: &str = "Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
  eth0: 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16
    lo:  100 200 0 0 0 0 0 0 200 100 0 0 0 0 0 0
";

/// Real-world layout with padded columns, several devices.
const NETDEV_PADDED: &str = "Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 2776770   11307    0    0    0     0          0         0  2776770   11307    0    0    0     0       0          0
  eth0: 1215645    2751    0    0    0     0          0         0  1782404    4324    0    0    0   427       0          0
docker0:       0       0    0    0    0     0          0         0      180       3    0    0    0     0       0          0
veth4b2c1:     840      10    0    0    0     0          0         0     1266      15    0    0    0     0       0          0
";

/// Creates `<root>/<pid>/net/dev` with `content` and a `self` symlink to it.
fn fake_procfs(pid: &str, content: &str) -> TempDir {
    let root = tempdir().expect("Failed to create temp procfs");
    let net = root.path().join(pid).join("net");
    fs::create_dir_all(&net).expect("Failed to create net dir");
    fs::write(net.join("dev"), content).expect("Failed to write net/dev");
    std::os::unix::fs::symlink(root.path().join(pid), root.path().join("self"))
        .expect("Failed to create self symlink");
    root
}

#[test]
fn test_collect_self_through_symlink() {
    let procfs = fake_procfs("31337", NETDEV);
    let ignore = compile_ignored_devices("^$").unwrap();

    let stats = get_netdev_stats(procfs.path(), "self", &ignore).unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats["eth0"]["receive_bytes"], "1");
    assert_eq!(stats["eth0"]["transmit_bytes"], "9");
    assert_eq!(stats["lo"]["receive_packets"], "200");
}

#[test]
fn test_collect_host_pid() {
    let procfs = fake_procfs("1", NETDEV_PADDED);
    let ignore = compile_ignored_devices("^(lo|veth.*)$").unwrap();

    let stats = get_netdev_stats(procfs.path(), "1", &ignore).unwrap();

    let mut devices: Vec<&str> = stats.keys().map(String::as_str).collect();
    devices.sort();
    assert_eq!(devices, vec!["docker0", "eth0"]);
    assert_eq!(stats["eth0"]["transmit_colls"], "427");
    assert_eq!(stats["docker0"]["transmit_packets"], "3");
}

#[test]
fn test_every_device_has_twice_the_header_fields() {
    let ignore = compile_ignored_devices("^$").unwrap();
    let stats = parse_netdev_stats(Cursor::new(NETDEV_PADDED), &ignore).unwrap();

    assert_eq!(stats.len(), 4);
    for (device, counters) in &stats {
        assert_eq!(counters.len(), 16, "device {device}");
        assert!(counters
            .keys()
            .all(|k| k.starts_with("receive_") || k.starts_with("transmit_")));
    }
}

#[test]
fn test_missing_process_is_an_error() {
    let procfs = fake_procfs("1", NETDEV);
    let ignore = compile_ignored_devices("^$").unwrap();

    let err = get_netdev_stats(procfs.path(), "2", &ignore).unwrap_err();
    assert!(matches!(err, NetDevError::PathResolution { .. }));
}

#[test]
fn test_dangling_symlink_is_an_error() {
    let procfs = tempdir().unwrap();
    std::os::unix::fs::symlink(procfs.path().join("gone"), procfs.path().join("self")).unwrap();
    let ignore = compile_ignored_devices("^$").unwrap();

    let err = get_netdev_stats(procfs.path(), "self", &ignore).unwrap_err();
    assert!(matches!(err, NetDevError::PathResolution { .. }));
}

#[test]
fn test_malformed_file_discards_everything() {
    let content = format!("{NETDEV}  eth1: 1 2 3\n");
    let procfs = fake_procfs("1", &content);
    let ignore = compile_ignored_devices("^$").unwrap();

    match get_netdev_stats(procfs.path(), "1", &ignore) {
        Err(NetDevError::InvalidLine(line)) => assert_eq!(line, "  eth1: 1 2 3"),
        other => panic!("expected invalid line, got {other:?}"),
    }
}

#[test]
fn test_collect_and_export() {
    let procfs = fake_procfs("1", NETDEV);
    let ignore = compile_ignored_devices("^lo$").unwrap();
    let registry = Registry::new();
    let metrics = NetDevMetrics::new(&registry).unwrap();

    let stats = get_netdev_stats(procfs.path(), "1", &ignore).unwrap();
    metrics.update(&stats).unwrap();

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert!(text.contains("herakles_network_receive_bytes_total{device=\"eth0\"} 1"));
    assert!(text.contains("herakles_network_transmit_carrier_total{device=\"eth0\"} 15"));
    assert!(!text.contains("device=\"lo\""));
}

#[test]
fn test_real_procfs() {
    if !Path::new("/proc/self/net/dev").exists() {
        return;
    }
    let ignore = compile_ignored_devices("^$").unwrap();
    let stats = get_netdev_stats("/proc", "self", &ignore).unwrap();
    for counters in stats.values() {
        assert!(counters.contains_key("receive_bytes"));
        assert!(counters.contains_key("transmit_bytes"));
    }
}
