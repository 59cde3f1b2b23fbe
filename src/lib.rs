// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)
)]

pub mod config;
pub mod loadsim;
pub mod logging;
pub mod syslog;
pub mod system;

// Re-export commonly used types
pub use config::{config_path, load_config, ConfigError, SimConfig};
pub use loadsim::{LoadSimulator, DEFAULT_EQUILIBRIUM, DEFAULT_TICK_INTERVAL};
pub use syslog::{
    format_entry, priority, Facility, LogWriter, Logger, LoggerError, LoggerIdentity, Severity,
    APPLICATION_LOG, ERROR_LOG, KERNEL_TAG,
};
pub use system::{System, SystemError};
