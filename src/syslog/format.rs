//! Pure formatting of RFC 3164-flavored log lines.

use super::types::{priority, Facility, Severity};
use chrono::{DateTime, Local};

/// Tag whose entries are formatted without a pid segment.
pub const KERNEL_TAG: &str = "kernel";

/// Format one log line:
///
/// ```text
/// <PRI>Mon DD HH:MM:SS hostname tag[pid]: message
/// ```
///
/// For the `kernel` tag the `[pid]` segment is omitted. Every line ends with
/// a single `\n` regardless of tag, so the destination files always contain
/// whole lines.
///
/// Formatting never fails; the caller supplies the timestamp so that entries
/// are stamped with the moment of the originating call.
#[must_use]
pub fn format_entry(
    facility: Facility,
    severity: Severity,
    hostname: &str,
    tag: &str,
    pid: u32,
    message: &str,
    timestamp: DateTime<Local>,
) -> String {
    let pri = priority(facility, severity);
    let stamp = timestamp.format("%b %d %H:%M:%S");
    if tag == KERNEL_TAG {
        format!("<{pri}>{stamp} {hostname} {tag}: {message}\n")
    } else {
        format!("<{pri}>{stamp} {hostname} {tag}[{pid}]: {message}\n")
    }
}
