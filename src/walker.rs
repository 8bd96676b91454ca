//! Sequence Walker
//!
//! Enumerates every sequence number between two segments and reports
//! whether each one was archived.

use std::ops::RangeInclusive;
use std::time::SystemTime;

use crate::archive::ArchiveSnapshot;
use crate::segment::Timeline;

/// One position visited by a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStep {
    pub sequence: u64,

    /// Modification time when the segment exists, `None` when it is missing
    pub modified: Option<SystemTime>,
}

impl WalkStep {
    pub fn exists(&self) -> bool {
        self.modified.is_some()
    }
}

/// Walks one timeline of an archive snapshot
///
/// Read-only: existence checks go against the snapshot, never the live
/// directory.
#[derive(Debug, Clone, Copy)]
pub struct SequenceWalker<'a> {
    snapshot: &'a ArchiveSnapshot,
    timeline: Timeline,
}

impl<'a> SequenceWalker<'a> {
    pub fn new(snapshot: &'a ArchiveSnapshot, timeline: Timeline) -> Self {
        Self { snapshot, timeline }
    }

    pub fn timeline(&self) -> Timeline {
        self.timeline
    }

    /// Lazily visit `from..=to` in order. Empty when `from > to`.
    pub fn walk(&self, from: u64, to: u64) -> Walk<'a> {
        Walk {
            snapshot: self.snapshot,
            timeline: self.timeline,
            range: from..=to,
        }
    }

    /// First existing segment in `start..=max`, with its modification time
    pub fn find_next_existing(&self, start: u64, max: u64) -> Option<(u64, SystemTime)> {
        self.snapshot
            .first_in_range(self.timeline, start, max)
            .map(|segment| (segment.id.to_linear(), segment.modified))
    }
}

/// Iterator returned by [`SequenceWalker::walk`]
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    snapshot: &'a ArchiveSnapshot,
    timeline: Timeline,
    range: RangeInclusive<u64>,
}

impl Iterator for Walk<'_> {
    type Item = WalkStep;

    fn next(&mut self) -> Option<Self::Item> {
        let sequence = self.range.next()?;
        Some(WalkStep {
            sequence,
            modified: self.snapshot.modified(self.timeline, sequence),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}
