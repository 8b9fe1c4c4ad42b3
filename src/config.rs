//! User configuration for the demo shell.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/capydispatch/config.json`.
//! Missing or malformed files fall back to defaults.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "capydispatch";
const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How many times the clock ticks before it stops re-arming.
    pub clock_ticks: u32,
    pub clock_interval_ms: u64,
    /// Delay before the deferred background scan fires.
    pub scan_delay_ms: u64,
    /// Size of the synthetic workload each scan sums up.
    pub scan_items: u64,
    /// The UI loop quits this long after startup.
    pub shutdown_after_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clock_ticks: 5,
            clock_interval_ms: 250,
            scan_delay_ms: 400,
            scan_items: 100_000,
            shutdown_after_ms: 2_000,
        }
    }
}

impl AppConfig {
    /// Load from the config file, or return defaults if not found
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                info!("No config at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid config at {}: {}. Using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save to config file
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

/// Get the config file path.
pub fn get_config_path() -> PathBuf {
    let xdg_config = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_default();
        format!("{}/.config", home)
    });

    PathBuf::from(xdg_config).join(CONFIG_DIR).join(CONFIG_FILE)
}
