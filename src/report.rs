//! Status Reporter
//!
//! Terminal outcomes of a check and the (severity, message) pair each one
//! maps to. Severities follow the monitoring-plugin exit code convention.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::segment::TimelineMismatch;

/// Urgency of a check result, ordered OK < WARNING < CRITICAL
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

impl Severity {
    /// Process exit code expected by the monitoring harness
    pub fn exit_code(&self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity plus the diagnostic line written for the harness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// First gap found by a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gap {
    /// Reconstructed name of the first missing segment
    pub first_missing: String,

    /// Name of the segment closing the gap
    pub next_present: String,

    /// Time between the last good segment and `next_present`
    pub elapsed: Duration,

    pub threshold: Duration,
    pub severity: Severity,
}

/// Terminal result of checking one archive directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    DirectoryMissing(PathBuf),

    /// The directory exists but listing it failed
    DirectoryUnreadable { dir: PathBuf, reason: String },

    /// No file in the directory decodes as a WAL segment
    DirectoryEmpty(PathBuf),

    TimelineMismatch(TimelineMismatch),

    SequenceGap(Gap),

    Healthy {
        /// Sequence positions walked
        checked: u64,
        first: String,
        last: String,

        /// First segment of a gap whose far edge was never found
        open_gap: Option<String>,
    },
}

impl Outcome {
    pub fn severity(&self) -> Severity {
        match self {
            Outcome::DirectoryMissing(_)
            | Outcome::DirectoryUnreadable { .. }
            | Outcome::DirectoryEmpty(_)
            | Outcome::TimelineMismatch(_) => Severity::Warning,
            Outcome::SequenceGap(gap) => gap.severity,
            Outcome::Healthy { .. } => Severity::Ok,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::DirectoryMissing(dir) => {
                format!("The directory {} does not exist", dir.display())
            }
            Outcome::DirectoryUnreadable { dir, reason } => {
                format!("The directory {} could not be read: {}", dir.display(), reason)
            }
            Outcome::DirectoryEmpty(dir) => {
                format!("The directory {} contains no WAL files", dir.display())
            }
            Outcome::TimelineMismatch(mismatch) => {
                format!("Multiple timelines found ({}), not supported", mismatch)
            }
            Outcome::SequenceGap(gap) => {
                let bound = describe_duration(gap.threshold);
                match gap.severity {
                    Severity::Critical => format!(
                        "Missing WAL files at {} (next WAL more than {} later)",
                        gap.first_missing, bound
                    ),
                    _ => format!(
                        "Missing WAL files at {} (next WAL less than {} later)",
                        gap.first_missing, bound
                    ),
                }
            }
            Outcome::Healthy { checked, first, last, open_gap } => {
                let mut message = format!(
                    "WAL sequence verified: {} segments from {} to {}",
                    checked, first, last
                );
                if let Some(open) = open_gap {
                    message.push_str(&format!("; unresolved gap from {}", open));
                }
                message
            }
        }
    }

    pub fn status(&self) -> Status {
        Status {
            severity: self.severity(),
            message: self.message(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.severity().exit_code()
    }
}

/// Render a threshold as "1 day", "6 hours", "90 seconds"...
pub fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (count, unit) = match secs {
        0 => (0, "second"),
        s if s % 86400 == 0 => (s / 86400, "day"),
        s if s % 3600 == 0 => (s / 3600, "hour"),
        s if s % 60 == 0 => (s / 60, "minute"),
        s => (s, "second"),
    };
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
