//! Check command implementation.
//!
//! Validates configuration and that net/dev of the configured process can be
//! located and parsed.

use herakles_netdev_exporter::{compile_ignored_devices, get_netdev_stats, locate_netdev};

use crate::config::{validate_effective_config, Config};

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Herakles Netdev Exporter - System Check");
    println!("===========================================");

    let mut all_ok = true;
    let procfs = config.procfs_path();
    let pid = config.netdev_pid();

    // Check procfs mount
    println!("\n📁 Checking procfs at {}...", procfs.display());
    if procfs.exists() {
        println!("   ✅ procfs accessible");
    } else {
        println!("   ❌ procfs not found");
        all_ok = false;
    }

    // Check net/dev resolution
    println!("\n🌐 Checking net/dev of PID '{}'...", pid);
    match locate_netdev(procfs, pid) {
        Ok(path) => println!("   ✅ Resolved to {}", path.display()),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    // Check parsing with the configured filter
    match compile_ignored_devices(config.netdev_ignored_devices()) {
        Ok(ignore) => match get_netdev_stats(procfs, pid, &ignore) {
            Ok(stats) => {
                let mut devices: Vec<&String> = stats.keys().collect();
                devices.sort();
                println!("   ✅ Parsed {} devices", stats.len());
                for device in devices {
                    println!("      ├─ {} ({} counters)", device, stats[device].len());
                }
            }
            Err(e) => {
                println!("   ❌ net/dev parsing failed: {}", e);
                all_ok = false;
            }
        },
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
