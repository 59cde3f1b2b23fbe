//! Facility and severity codes recognized by the simulated syslog subsystem.

use thiserror::Error;

/// Source category of a log entry, per RFC 3164 facility numbering.
///
/// Only the facilities actually emitted by the simulation are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    /// Kernel messages (0).
    Kern = 0,
    /// Messages generated internally by the logger itself (5).
    Syslog = 5,
    /// Clock daemon / cron messages (9).
    Cron = 9,
}

/// Urgency of a log entry, per RFC 3164 severity numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Error conditions (3). Routed to the error destination.
    Err = 3,
    /// Normal but significant conditions (5).
    Notice = 5,
    /// Informational messages (6).
    Info = 6,
    /// Debug-level messages (7).
    Debug = 7,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized facility code: {0}")]
pub struct UnknownFacility(pub u8);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized severity code: {0}")]
pub struct UnknownSeverity(pub u8);

impl TryFrom<u8> for Facility {
    type Error = UnknownFacility;

    fn try_from(code: u8) -> Result<Self, UnknownFacility> {
        match code {
            0 => Ok(Self::Kern),
            5 => Ok(Self::Syslog),
            9 => Ok(Self::Cron),
            other => Err(UnknownFacility(other)),
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = UnknownSeverity;

    fn try_from(code: u8) -> Result<Self, UnknownSeverity> {
        match code {
            3 => Ok(Self::Err),
            5 => Ok(Self::Notice),
            6 => Ok(Self::Info),
            7 => Ok(Self::Debug),
            other => Err(UnknownSeverity(other)),
        }
    }
}

/// Compute the RFC 3164 priority value for a facility/severity pair.
///
/// Always derived from the two codes at the call site; the value is never
/// cached anywhere.
#[must_use]
pub fn priority(facility: Facility, severity: Severity) -> u8 {
    facility as u8 * 8 + severity as u8
}
