//! Simulated syslog subsystem: RFC 3164-flavored formatting, severity-routed
//! file persistence, and the lifecycle-managed logger service.

pub mod format;
pub mod service;
pub mod types;
pub mod writer;

pub use format::{format_entry, KERNEL_TAG};
pub use service::{Logger, LoggerError, LoggerIdentity};
pub use types::{priority, Facility, Severity, UnknownFacility, UnknownSeverity};
pub use writer::{LogWriter, APPLICATION_LOG, ERROR_LOG};
