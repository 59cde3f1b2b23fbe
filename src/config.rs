//! Daemon configuration loaded from `~/.hostsim/config.toml`.
//!
//! The file is optional; if it does not exist every field falls back to its
//! `Default` value, so a bare `hostsimd` invocation always works.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid tick interval: {0}")]
    TickInterval(#[from] humantime::DurationError),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Top-level daemon configuration, deserialized from
/// `~/.hostsim/config.toml`.
///
/// All fields are optional at the TOML level; missing fields resolve to
/// their `Default` values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    /// Hostname stamped on emitted log entries.
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Pid stamped on the logger's own lifecycle entries. Defaults to the
    /// real process id.
    #[serde(default = "default_pid")]
    pub pid: u32,

    /// Directory holding `application.log` and `error.log`.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Interval between load-simulator steps, as a humantime string
    /// (e.g. `"1s"`, `"250ms"`).
    #[serde(default = "default_tick_interval")]
    pub tick_interval: String,

    /// Resting value the simulated CPU usage drifts toward.
    #[serde(default = "default_equilibrium")]
    pub equilibrium: f64,
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_pid() -> u32 {
    std::process::id()
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_tick_interval() -> String {
    "1s".to_string()
}

fn default_equilibrium() -> f64 {
    0.10
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            pid: default_pid(),
            logs_dir: default_logs_dir(),
            tick_interval: default_tick_interval(),
            equilibrium: default_equilibrium(),
        }
    }
}

impl SimConfig {
    /// Parse the tick interval string into a [`Duration`].
    pub fn tick_interval(&self) -> Result<Duration, ConfigError> {
        Ok(humantime::parse_duration(&self.tick_interval)?)
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Resolve the canonical path for the config file
/// (`~/.hostsim/config.toml`).
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hostsim").join("config.toml"))
}

/// Load configuration from `path`, or from the canonical location when
/// `path` is `None`.
///
/// Returns `Ok(SimConfig::default())` if the file does not exist so callers
/// never need to handle the "absent file" case specially.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig, ConfigError> {
    let path = match path.map(Path::to_path_buf).or_else(config_path) {
        Some(p) => p,
        None => {
            warn!("Could not determine config directory; using defaults");
            return Ok(SimConfig::default());
        }
    };

    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(SimConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config: SimConfig = toml::from_str(&content)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
