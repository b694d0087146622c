//! Configuration management for herakles-netdev-exporter.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use herakles_netdev_exporter::{
    compile_ignored_devices, DEFAULT_IGNORED_DEVICES, DEFAULT_NETDEV_PID, DEFAULT_PROCFS_PATH,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9216;

/// Exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,

    // net/dev collection
    /// "self" or a numeric PID whose network namespace is reported
    #[serde(alias = "netdev-pid")]
    pub netdev_pid: Option<String>,
    /// Regex of devices to leave out
    #[serde(alias = "netdev-ignored-devices")]
    pub netdev_ignored_devices: Option<String>,
    #[serde(alias = "procfs-path")]
    pub procfs_path: Option<PathBuf>,

    // Feature flags
    pub enable_health: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<LogLevel>,

    // TLS/SSL Configuration
    #[serde(alias = "enable-tls")]
    pub enable_tls: Option<bool>,
    #[serde(alias = "tls-cert-path")]
    pub tls_cert_path: Option<String>,
    #[serde(alias = "tls-key-path")]
    pub tls_key_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            port: Some(DEFAULT_PORT),
            netdev_pid: Some(DEFAULT_NETDEV_PID.to_string()),
            netdev_ignored_devices: Some(DEFAULT_IGNORED_DEVICES.to_string()),
            procfs_path: Some(PathBuf::from(DEFAULT_PROCFS_PATH)),
            enable_health: Some(true),
            log_level: Some(LogLevel::Info),
            enable_tls: Some(false),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Config {
    /// Effective PID, falling back to "self".
    pub fn netdev_pid(&self) -> &str {
        self.netdev_pid.as_deref().unwrap_or(DEFAULT_NETDEV_PID)
    }

    /// Effective ignored-devices pattern, falling back to one that matches nothing.
    pub fn netdev_ignored_devices(&self) -> &str {
        self.netdev_ignored_devices
            .as_deref()
            .unwrap_or(DEFAULT_IGNORED_DEVICES)
    }

    /// Effective log level, falling back to info.
    pub fn log_level(&self) -> LogLevel {
        self.log_level.unwrap_or(LogLevel::Info)
    }

    /// Effective procfs root, falling back to /proc.
    pub fn procfs_path(&self) -> &Path {
        self.procfs_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_PROCFS_PATH))
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // PID must be "self" or numeric; it becomes a path component.
    let pid = cfg.netdev_pid();
    if pid != DEFAULT_NETDEV_PID && (pid.is_empty() || !pid.chars().all(|c| c.is_ascii_digit())) {
        return Err(format!("Invalid netdev_pid '{}', expected 'self' or a numeric PID", pid).into());
    }

    compile_ignored_devices(cfg.netdev_ignored_devices())?;

    // TLS validation
    if cfg.enable_tls.unwrap_or(false) {
        let cert_path = cfg.tls_cert_path.as_deref();
        let key_path = cfg.tls_key_path.as_deref();

        match (cert_path, key_path) {
            (None, None) => {
                return Err(
                    "TLS is enabled but neither tls_cert_path nor tls_key_path are set".into(),
                );
            }
            (Some(_), None) => {
                return Err("TLS is enabled but tls_key_path is not set".into());
            }
            (None, Some(_)) => {
                return Err("TLS is enabled but tls_cert_path is not set".into());
            }
            (Some(cert), Some(key)) => {
                check_pem_file(cert, "certificate")?;
                check_pem_file(key, "private key")?;
            }
        }
    }

    Ok(())
}

/// Checks that a TLS PEM file exists, is readable and not empty.
fn check_pem_file(path: &str, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        return Err(format!("TLS {} file not found: {}", what, path).into());
    }

    match fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => Err(format!("TLS {} file is empty: {}", what, path).into()),
        Err(e) => Err(format!("TLS {} file is not readable: {} ({})", what, path, e).into()),
        Ok(_) => Ok(()),
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Override with CLI args
    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }

    // Only override port if the user supplied it on the CLI.
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    if let Some(level) = args.log_level {
        config.log_level = Some(level);
    }

    // net/dev collection
    if let Some(pid) = &args.netdev_pid {
        config.netdev_pid = Some(pid.trim().to_string());
    }
    if let Some(pattern) = &args.netdev_ignored_devices {
        config.netdev_ignored_devices = Some(pattern.clone());
    }
    if let Some(procfs) = &args.procfs_path {
        config.procfs_path = Some(procfs.clone());
    }

    // Feature flags
    if args.disable_health {
        config.enable_health = Some(false);
    }

    // TLS configuration: CLI wins if provided
    if args.enable_tls {
        config.enable_tls = Some(true);
    }
    if let Some(cert_path) = &args.tls_cert {
        config.tls_cert_path = Some(cert_path.to_string_lossy().to_string());
    }
    if let Some(key_path) = &args.tls_key {
        config.tls_key_path = Some(key_path.to_string_lossy().to_string());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/herakles/netdev-exporter.yaml",
            "/etc/herakles/netdev-exporter.yml",
            "/etc/herakles/netdev-exporter.json",
            "./herakles-netdev-exporter.yaml",
            "./herakles-netdev-exporter.yml",
            "./herakles-netdev-exporter.json",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_default()
    };

    if path.as_os_str().is_empty() || !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders configuration in the requested format
pub fn render_config(config: &Config, format: &ConfigFormat) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(validate_effective_config(&config).is_ok());
        assert_eq!(config.netdev_pid(), "self");
        assert_eq!(config.netdev_ignored_devices(), "^$");
        assert_eq!(config.procfs_path(), Path::new("/proc"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let config: Config = serde_yaml::from_str("port: 9300\n").unwrap();
        assert_eq!(config.port, Some(9300));
        assert_eq!(config.netdev_pid(), "self");
        assert_eq!(config.procfs_path(), Path::new("/proc"));
    }

    #[test]
    fn test_invalid_pid_rejected() {
        let config = Config {
            netdev_pid: Some("../1".into()),
            ..Config::default()
        };
        let err = validate_effective_config(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid netdev_pid"));
    }

    #[test]
    fn test_numeric_pid_accepted() {
        let config = Config {
            netdev_pid: Some("1".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = Config {
            netdev_ignored_devices: Some("(lo".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&config).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "netdev_pid: \"1\"\nnetdev_ignored_devices: \"^lo$\"\nport: 9300").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let args = Args::parse_from([
            "herakles-netdev-exporter",
            "--config",
            path.as_str(),
            "--netdev-pid",
            "self",
        ]);
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.netdev_pid(), "self");
        assert_eq!(config.netdev_ignored_devices(), "^lo$");
        assert_eq!(config.port, Some(9300));
    }

    #[test]
    fn test_log_level_from_file_and_cli() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "log_level: debug").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = Args::parse_from(["herakles-netdev-exporter", "--config", path.as_str()]);
        assert_eq!(resolve_config(&args).unwrap().log_level(), LogLevel::Debug);

        let args = Args::parse_from([
            "herakles-netdev-exporter",
            "--config",
            path.as_str(),
            "--log-level",
            "off",
        ]);
        assert_eq!(resolve_config(&args).unwrap().log_level(), LogLevel::Off);

        let args = Args::parse_from(["herakles-netdev-exporter", "--no-config"]);
        assert_eq!(resolve_config(&args).unwrap().log_level(), LogLevel::Info);
    }

    #[test]
    fn test_unknown_log_level_in_file_is_rejected() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "log_level: loud").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_json_config() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"procfs-path": "/host/proc", "netdev-pid": "1"}}"#).unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.procfs_path(), Path::new("/host/proc"));
        assert_eq!(config.netdev_pid(), "1");
    }

    #[test]
    fn test_render_roundtrips_through_yaml() {
        let rendered = render_config(&Config::default(), &ConfigFormat::Yaml).unwrap();
        assert!(rendered.contains("netdev_pid: self"));
        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed.port, Some(DEFAULT_PORT));
    }
}
