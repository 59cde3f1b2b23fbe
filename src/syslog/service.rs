//! Lifecycle-managed logger service gating access to the [`LogWriter`].
//!
//! The reference design used process-global mutable hostname/pid fields set
//! via separate calls before construction. Here identity is a plain struct
//! validated once by [`Logger::new`] and immutable afterward, which removes
//! the init-order hazard without any locking protocol.

use super::format::{format_entry, KERNEL_TAG};
use super::types::{Facility, Severity};
use super::writer::LogWriter;
use chrono::Local;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoggerError {
    #[error("Logger could not be constructed: hostname is empty")]
    MissingHostname,

    #[error("Logger could not be constructed: pid is zero")]
    MissingPid,

    #[error("Logger is stopped and accepts no further calls")]
    Stopped,
}

/// Identity stamped on the logger's own lifecycle entries.
///
/// Both fields must be established before construction; there are no
/// setters afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerIdentity {
    pub hostname: String,
    pub pid: u32,
}

/// Synchronous logger service.
///
/// Lifecycle: construction validates the identity and emits a
/// `Logger initiated.` entry (READY); [`Logger::close`] emits
/// `Logger terminating...` and transitions to STOPPED, after which every
/// call returns [`LoggerError::Stopped`].
///
/// Every `write_log` call runs on the caller's thread and blocks for the
/// duration of the file append; there is no internal queue, so entries from
/// a single caller land in call order.
#[derive(Debug)]
pub struct Logger {
    identity: LoggerIdentity,
    writer: LogWriter,
    stopped: AtomicBool,
}

impl Logger {
    /// Construct the logger and emit the initiation entry.
    ///
    /// # Errors
    ///
    /// Fails with [`LoggerError::MissingHostname`] or
    /// [`LoggerError::MissingPid`] when the identity is incomplete. No
    /// entry is emitted in that case.
    pub fn new(
        identity: LoggerIdentity,
        logs_dir: impl Into<PathBuf>,
    ) -> Result<Self, LoggerError> {
        if identity.hostname.is_empty() {
            return Err(LoggerError::MissingHostname);
        }
        if identity.pid == 0 {
            return Err(LoggerError::MissingPid);
        }
        let logger = Self {
            identity,
            writer: LogWriter::new(logs_dir),
            stopped: AtomicBool::new(false),
        };
        logger.write_lifecycle("Logger initiated.");
        Ok(logger)
    }

    #[must_use]
    pub fn identity(&self) -> &LoggerIdentity {
        &self.identity
    }

    /// Format an entry (timestamped with the moment of this call) and append
    /// it to the destination selected by `severity`.
    ///
    /// I/O faults are absorbed by the writer; the only observable failure is
    /// [`LoggerError::Stopped`] after [`Logger::close`].
    pub fn write_log(
        &self,
        facility: Facility,
        severity: Severity,
        hostname: &str,
        tag: &str,
        pid: u32,
        message: &str,
    ) -> Result<(), LoggerError> {
        self.ensure_ready()?;
        let line = format_entry(
            facility,
            severity,
            hostname,
            tag,
            pid,
            message,
            Local::now(),
        );
        self.writer.append(severity, &line);
        Ok(())
    }

    /// Truncate both destinations. Available only while READY.
    pub fn wipe_logs(&self) -> Result<(), LoggerError> {
        self.ensure_ready()?;
        self.writer.wipe();
        Ok(())
    }

    /// Emit the termination entry and stop accepting calls.
    ///
    /// # Errors
    ///
    /// A second `close` returns [`LoggerError::Stopped`].
    pub fn close(&self) -> Result<(), LoggerError> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Err(LoggerError::Stopped);
        }
        self.write_lifecycle("Logger terminating...");
        Ok(())
    }

    // Self-referential entries: facility=syslog, severity=notice, tag=kernel.
    fn write_lifecycle(&self, message: &str) {
        let line = format_entry(
            Facility::Syslog,
            Severity::Notice,
            &self.identity.hostname,
            KERNEL_TAG,
            self.identity.pid,
            message,
            Local::now(),
        );
        self.writer.append(Severity::Notice, &line);
    }

    fn ensure_ready(&self) -> Result<(), LoggerError> {
        if self.stopped.load(Ordering::SeqCst) {
            Err(LoggerError::Stopped)
        } else {
            Ok(())
        }
    }
}
