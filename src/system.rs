//! Process-wide composition root tying the logger service and the load
//! simulator together into one handle.

use crate::config::{ConfigError, SimConfig};
use crate::loadsim::LoadSimulator;
use crate::syslog::{Logger, LoggerError, LoggerIdentity};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::info;

static SYSTEM: OnceLock<System> = OnceLock::new();

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("System facade already initialized")]
    AlreadyInitialized,

    #[error("System facade has not been initialized")]
    Uninitialized,

    #[error(transparent)]
    Logger(#[from] LoggerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One process-wide handle owning the [`Logger`] and the [`LoadSimulator`].
///
/// Collaborators (process manager, cron, CLI) receive `&'static System` and
/// never hold private copies of the underlying state.
#[derive(Debug)]
pub struct System {
    logger: Logger,
    cpu: LoadSimulator,
}

impl System {
    /// Build the facade and install it as the process-wide instance.
    ///
    /// # Errors
    ///
    /// Fails with [`SystemError::AlreadyInitialized`] on a second call, or
    /// with the underlying [`LoggerError`] / [`ConfigError`] when the
    /// identity is invalid or the tick interval cannot be parsed. On
    /// failure nothing is installed and no log entry is emitted.
    pub fn init(config: &SimConfig) -> Result<&'static Self, SystemError> {
        // Gate before constructing the logger: building it emits the
        // initiation entry, which a rejected call must not do.
        if SYSTEM.get().is_some() {
            return Err(SystemError::AlreadyInitialized);
        }
        let tick_interval = config.tick_interval()?;
        let identity = LoggerIdentity {
            hostname: config.hostname.clone(),
            pid: config.pid,
        };
        let logger = Logger::new(identity, &config.logs_dir)?;
        let cpu = LoadSimulator::new(config.equilibrium, tick_interval);
        let system = Self { logger, cpu };
        SYSTEM
            .set(system)
            .map_err(|_| SystemError::AlreadyInitialized)?;
        info!("System facade initialized for host {}", config.hostname);
        Self::global()
    }

    /// The installed process-wide instance.
    ///
    /// # Errors
    ///
    /// Fails with [`SystemError::Uninitialized`] before [`System::init`].
    pub fn global() -> Result<&'static Self, SystemError> {
        SYSTEM.get().ok_or(SystemError::Uninitialized)
    }

    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    #[must_use]
    pub fn cpu_usage(&self) -> f64 {
        self.cpu.usage()
    }

    pub fn increment_cpu_usage(&self, delta: f64) {
        self.cpu.increment_usage(delta);
    }

    /// Launch the load simulator's timer loop.
    pub fn start_cpu_manager(&self) {
        self.cpu.start();
    }

    /// Stop the load simulator, then close the logger (which emits the
    /// termination entry).
    pub async fn shutdown(&self) -> Result<(), SystemError> {
        self.cpu.stop().await;
        self.logger.close()?;
        Ok(())
    }
}
