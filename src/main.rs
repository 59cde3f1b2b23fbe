// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)
)]

use clap::Parser;
use color_eyre::eyre::Result;
use hostsimd::logging::{init_logging, parse_rotation, LogConfig};
use hostsimd::{load_config, Facility, Severity, System};
use std::path::PathBuf;
use tracing::{info, warn};

/// Hostsim Daemon - Simulated host telemetry: syslog-style logging and a
/// synthetic CPU load metric
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file (default: ~/.hostsim/config.toml)
    #[arg(short, long, env = "HOSTSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the simulated syslog destinations (overrides config)
    #[arg(long, env = "HOSTSIM_LOGS_DIR")]
    logs_dir: Option<PathBuf>,

    /// Hostname stamped on emitted entries (overrides config)
    #[arg(long, env = "HOSTSIM_HOSTNAME")]
    hostname: Option<String>,

    /// Interval between CPU usage report entries
    #[arg(long, env = "HOSTSIM_REPORT_INTERVAL", default_value = "30s")]
    report_interval: String,

    /// Enable JSON format for daemon diagnostics
    #[arg(long, env = "HOSTSIM_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Diagnostic log rotation period: daily, hourly, or never
    #[arg(long, env = "HOSTSIM_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom diagnostic log directory (default: ~/.hostsim/logs)
    #[arg(long, env = "HOSTSIM_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    let args = Args::parse();

    let log_config = LogConfig {
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };
    let log_config = match args.log_dir {
        Some(log_dir) => LogConfig {
            log_dir,
            ..log_config
        },
        None => log_config,
    };
    init_logging(log_config)?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(logs_dir) = args.logs_dir {
        config.logs_dir = logs_dir;
    }
    if let Some(hostname) = args.hostname {
        config.hostname = hostname;
    }
    let report_interval = humantime::parse_duration(&args.report_interval)?;

    let system = System::init(&config)?;
    system.start_cpu_manager();
    info!(
        "hostsimd running for host {}; usage reports every {}",
        config.hostname, args.report_interval
    );

    let mut report = tokio::time::interval(report_interval);
    report.tick().await; // the zeroth tick fires immediately
    loop {
        tokio::select! {
            _ = report.tick() => {
                let usage = system.cpu_usage();
                let message = format!("cpu usage at {usage:.2}");
                if let Err(e) = system.logger().write_log(
                    Facility::Cron,
                    Severity::Info,
                    &config.hostname,
                    "cron",
                    config.pid,
                    &message,
                ) {
                    warn!("Usage report rejected: {e}");
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl-C: {e}");
                }
                info!("Received shutdown signal, stopping...");
                break;
            }
        }
    }

    system.shutdown().await?;
    info!("hostsimd stopped");
    Ok(())
}
