//! Timeline identifiers
//!
//! Every segment name starts with the 8 hex digit timeline it belongs to.

use std::fmt;

use crate::error::{Result, WalCheckError};

/// Width of the timeline field in a segment name
pub(crate) const TIMELINE_LEN: usize = 8;

/// A WAL timeline (branch of history created by a recovery)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timeline(u32);

impl Timeline {
    pub const fn new(id: u32) -> Self {
        Timeline(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }

    /// Parse the 8 hex digit timeline field
    pub fn parse(field: &str) -> Result<Self> {
        if field.len() != TIMELINE_LEN || !field.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(WalCheckError::malformed(
                field,
                format!("timeline must be {} hex digits", TIMELINE_LEN),
            ));
        }
        u32::from_str_radix(field, 16)
            .map(Timeline)
            .map_err(|e| WalCheckError::malformed(field, e.to_string()))
    }

    /// The timeline shared by both ends of the archive, or the mismatch
    /// between them. Recovery across timelines cannot be verified here, so
    /// the caller decides how to report it.
    pub fn shared(oldest: Timeline, newest: Timeline) -> std::result::Result<Self, TimelineMismatch> {
        if oldest == newest {
            Ok(oldest)
        } else {
            Err(TimelineMismatch { oldest, newest })
        }
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// Oldest and newest archived segments sit on different timelines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineMismatch {
    pub oldest: Timeline,
    pub newest: Timeline,
}

impl fmt::Display for TimelineMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {}", self.oldest, self.newest)
    }
}
