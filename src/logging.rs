//! Daemon diagnostics (tracing) — separate from the simulated syslog files.
//!
//! Absorbed I/O faults in the syslog writer surface here as warnings, so
//! the fire-and-forget policy never hides failures from an operator.

use color_eyre::eyre::Result;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Diagnostic log filename used by the daemon.
pub const LOG_FILENAME: &str = "hostsimd.log";

/// Configuration for the diagnostic logging system.
pub struct LogConfig {
    /// Directory where diagnostic log files will be written.
    pub log_dir: PathBuf,
    /// Default log level when `RUST_LOG` is not set.
    pub log_level: Level,
    /// Whether to use JSON format.
    pub json_format: bool,
    /// Log rotation period.
    pub rotation: Rotation,
}

impl Default for LogConfig {
    fn default() -> Self {
        let log_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hostsim")
            .join("logs");

        Self {
            log_dir,
            log_level: Level::INFO,
            json_format: false,
            rotation: Rotation::DAILY,
        }
    }
}

fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hostsimd={default_level}")))
}

/// Initialize diagnostic logging with dual output to a rotated file and
/// stdout. The level is runtime-configurable via `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init_logging(config: LogConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;
    let file_appender = RollingFileAppender::new(config.rotation, &config.log_dir, LOG_FILENAME);

    let (file_layer, stdout_layer) = if config.json_format {
        (
            fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_target(true)
                .with_filter(env_filter(config.log_level))
                .boxed(),
            fmt::layer()
                .json()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_filter(env_filter(config.log_level))
                .boxed(),
        )
    } else {
        (
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // No ANSI colors in files
                .with_filter(env_filter(config.log_level))
                .boxed(),
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_filter(env_filter(config.log_level))
                .boxed(),
        )
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

/// Parse rotation period from string.
#[must_use]
pub fn parse_rotation(s: &str) -> Rotation {
    match s.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}
