//! CLI command implementations for herakles-netdev-exporter.
//!
//! This module provides implementations for all CLI subcommands:
//! - `check`: net/dev accessibility and configuration validation
//! - `config`: Configuration file generation
//! - `test`: net/dev collection testing

pub mod check;
pub mod config;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use test::command_test;
