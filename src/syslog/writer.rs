//! Severity-routed persistence to the two append-only log destinations.
//!
//! I/O failures here are absorbed on purpose: the telemetry subsystem must
//! never destabilize the subsystem it is observing. Each failure is reported
//! on the daemon's diagnostic channel and the caller continues normally.

use super::types::Severity;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Destination for every severity except [`Severity::Err`].
pub const APPLICATION_LOG: &str = "application.log";

/// Destination for [`Severity::Err`] entries.
pub const ERROR_LOG: &str = "error.log";

/// Appends formatted lines to `application.log` / `error.log` inside a fixed
/// logs directory, creating directory and files on first use.
#[derive(Debug)]
pub struct LogWriter {
    logs_dir: PathBuf,
}

impl LogWriter {
    #[must_use]
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
        }
    }

    /// Destination filename for a severity. The only routing rule: `Err`
    /// goes to the error destination, everything else to the application
    /// destination.
    #[must_use]
    pub fn destination(severity: Severity) -> &'static str {
        if severity == Severity::Err {
            ERROR_LOG
        } else {
            APPLICATION_LOG
        }
    }

    /// Append one formatted line to the destination selected by `severity`.
    ///
    /// Fire-and-forget: failures are reported via `tracing::warn!` and not
    /// surfaced to the caller. The line is written with a single `write_all`
    /// on a file opened in append mode, so concurrent writers never produce
    /// interleaved partial lines.
    pub fn append(&self, severity: Severity, line: &str) {
        let path = self.logs_dir.join(Self::destination(severity));
        if let Err(e) = self.try_append(&path, line) {
            warn!("Failed to append to {}: {e}", path.display());
        }
    }

    fn try_append(&self, path: &Path, line: &str) -> io::Result<()> {
        fs::create_dir_all(&self.logs_dir)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())
    }

    /// Truncate both destinations to zero length.
    ///
    /// The two truncations are independent; a failure on one does not stop
    /// the attempt on the other, and each failure is reported separately.
    pub fn wipe(&self) {
        for name in [APPLICATION_LOG, ERROR_LOG] {
            let path = self.logs_dir.join(name);
            if let Err(e) = self.truncate(&path) {
                warn!("Failed to wipe {}: {e}", path.display());
            }
        }
    }

    fn truncate(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(&self.logs_dir)?;
        fs::write(path, b"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("Failed to create temp directory")
    }

    #[test]
    fn test_destination_routing() {
        assert_eq!(LogWriter::destination(Severity::Err), ERROR_LOG);
        assert_eq!(LogWriter::destination(Severity::Notice), APPLICATION_LOG);
        assert_eq!(LogWriter::destination(Severity::Info), APPLICATION_LOG);
        assert_eq!(LogWriter::destination(Severity::Debug), APPLICATION_LOG);
    }

    #[test]
    fn test_append_creates_directory_and_file() {
        let dir = create_test_dir();
        let logs_dir = dir.path().join("logs");
        let writer = LogWriter::new(&logs_dir);

        writer.append(Severity::Info, "hello\n");

        let content = std::fs::read_to_string(logs_dir.join(APPLICATION_LOG)).unwrap();
        assert_eq!(content, "hello\n");
    }

    #[test]
    fn test_append_preserves_call_order() {
        let dir = create_test_dir();
        let writer = LogWriter::new(dir.path());

        writer.append(Severity::Info, "first\n");
        writer.append(Severity::Debug, "second\n");

        let content = std::fs::read_to_string(dir.path().join(APPLICATION_LOG)).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_err_severity_routes_to_error_log() {
        let dir = create_test_dir();
        let writer = LogWriter::new(dir.path());

        writer.append(Severity::Err, "boom\n");

        let error = std::fs::read_to_string(dir.path().join(ERROR_LOG)).unwrap();
        assert_eq!(error, "boom\n");
        assert!(!dir.path().join(APPLICATION_LOG).exists());
    }

    #[test]
    fn test_append_failure_is_absorbed() {
        // Point the logs directory at a path occupied by a regular file so
        // create_dir_all fails. The call must not panic or error out.
        let dir = create_test_dir();
        let blocker = dir.path().join("notadir");
        std::fs::write(&blocker, b"x").unwrap();
        let writer = LogWriter::new(&blocker);

        writer.append(Severity::Info, "dropped\n");
    }

    #[test]
    fn test_wipe_truncates_both_destinations() {
        let dir = create_test_dir();
        let writer = LogWriter::new(dir.path());
        writer.append(Severity::Info, "app entry\n");
        writer.append(Severity::Err, "err entry\n");

        writer.wipe();

        let app = std::fs::metadata(dir.path().join(APPLICATION_LOG)).unwrap();
        let err = std::fs::metadata(dir.path().join(ERROR_LOG)).unwrap();
        assert_eq!(app.len(), 0);
        assert_eq!(err.len(), 0);
    }

    #[test]
    fn test_wipe_continues_past_an_unwritable_destination() {
        // Occupy application.log with a directory so its truncation fails;
        // error.log must still be wiped and the call must not panic.
        let dir = create_test_dir();
        let writer = LogWriter::new(dir.path());
        std::fs::create_dir(dir.path().join(APPLICATION_LOG)).unwrap();
        writer.append(Severity::Err, "err entry\n");

        writer.wipe();

        assert_eq!(
            std::fs::metadata(dir.path().join(ERROR_LOG)).unwrap().len(),
            0
        );
    }

    #[test]
    fn test_wipe_creates_empty_files_when_absent() {
        let dir = create_test_dir();
        let writer = LogWriter::new(dir.path());

        writer.wipe();

        assert_eq!(
            std::fs::metadata(dir.path().join(APPLICATION_LOG)).unwrap().len(),
            0
        );
        assert_eq!(
            std::fs::metadata(dir.path().join(ERROR_LOG)).unwrap().len(),
            0
        );
    }
}
