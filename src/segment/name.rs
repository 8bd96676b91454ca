//! Segment names
//!
//! Strict fixed-width codec between file names and [`SegmentId`]s.

use std::fmt;

use crate::error::{Result, WalCheckError};
use super::timeline::{Timeline, TIMELINE_LEN};

/// Length of a segment name body (suffix excluded)
pub const NAME_LEN: usize = 24;

/// Segments per logical id; numbering wraps to the next logical id at 0x100
pub const SEGMENTS_PER_LOGICAL: u64 = 0x100;

/// Width of the logical and physical fields
const FIELD_LEN: usize = 8;

/// Identity of one archived WAL segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId {
    /// Timeline the segment was written on
    pub timeline: Timeline,

    /// High part of the position (logical log file)
    pub logical: u32,

    /// Low byte of the position (segment within the logical file)
    pub segment: u8,
}

impl SegmentId {
    pub fn new(timeline: Timeline, logical: u32, segment: u8) -> Self {
        Self { timeline, logical, segment }
    }

    /// Collapse (logical, segment) into one monotonically increasing number
    pub fn to_linear(&self) -> u64 {
        (u64::from(self.logical) << 8) | u64::from(self.segment)
    }

    /// Inverse of [`SegmentId::to_linear`]
    pub fn from_linear(timeline: Timeline, sequence: u64) -> Result<Self> {
        let logical = u32::try_from(sequence >> 8)
            .map_err(|_| WalCheckError::SequenceOutOfRange(sequence))?;
        Ok(Self {
            timeline,
            logical,
            segment: (sequence % SEGMENTS_PER_LOGICAL) as u8,
        })
    }

    /// The 16 hex digit value that follows the timeline in the file name:
    /// logical id in the high 32 bits, segment in the low byte
    pub fn raw_value(&self) -> u64 {
        (u64::from(self.logical) << 32) | u64::from(self.segment)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:016X}", self.timeline, self.raw_value())
    }
}

/// Encodes and decodes segment file names carrying an optional suffix
#[derive(Debug, Clone, Default)]
pub struct SegmentCodec {
    suffix: String,
}

impl SegmentCodec {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Decode a file name into a [`SegmentId`]
    ///
    /// The body must be exactly 24 hex digits. A physical field above 0xFF
    /// carries into the logical id so that name order is preserved.
    pub fn decode(&self, file_name: &str) -> Result<SegmentId> {
        let body = file_name
            .strip_suffix(self.suffix.as_str())
            .ok_or_else(|| {
                WalCheckError::malformed(file_name, format!("missing suffix {:?}", self.suffix))
            })?;

        if body.len() != NAME_LEN {
            return Err(WalCheckError::malformed(
                file_name,
                format!("expected {} hex digits, found {} bytes", NAME_LEN, body.len()),
            ));
        }
        if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(WalCheckError::malformed(file_name, "contains non-hex characters"));
        }

        // All ASCII from here, byte offsets are char boundaries
        let timeline = Timeline::parse(&body[..TIMELINE_LEN])?;
        let logical = parse_field(file_name, &body[TIMELINE_LEN..TIMELINE_LEN + FIELD_LEN])?;
        let physical = parse_field(file_name, &body[TIMELINE_LEN + FIELD_LEN..])?;

        let sequence = (u64::from(logical) << 8) + u64::from(physical);
        SegmentId::from_linear(timeline, sequence)
            .map_err(|_| WalCheckError::malformed(file_name, "position overflows the logical id"))
    }

    /// Timeline followed by `value` as 16 zero-padded hex digits and the suffix
    pub fn encode(&self, timeline: Timeline, value: u64) -> String {
        format!("{}{:016X}{}", timeline, value, self.suffix)
    }

    /// File name of an archived segment
    pub fn file_name(&self, id: &SegmentId) -> String {
        self.encode(id.timeline, id.raw_value())
    }

    /// File name expected for a linear sequence number on `timeline`
    pub fn name_for_sequence(&self, timeline: Timeline, sequence: u64) -> Result<String> {
        SegmentId::from_linear(timeline, sequence).map(|id| self.file_name(&id))
    }
}

fn parse_field(file_name: &str, field: &str) -> Result<u32> {
    u32::from_str_radix(field, 16).map_err(|e| WalCheckError::malformed(file_name, e.to_string()))
}
