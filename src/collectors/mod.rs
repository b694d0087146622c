//! Collectors module for network interface metrics.
//!
//! This module contains the net/dev collector that turns the kernel's
//! per-interface counter table into raw, string-valued statistics.

pub mod netdev;
