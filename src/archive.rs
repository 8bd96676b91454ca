//! Archive Snapshot
//!
//! One read of an archive directory: every WAL segment found, with the
//! modification time observed when it was listed.
//!
//! ## Responsibilities
//! - List the directory once and stat each file once
//! - Skip anything that is not an archived segment (history files,
//!   backup labels, partial segments, subdirectories)
//! - Index segments by (timeline, linear sequence) for the walker
//!
//! Times are never re-read after the snapshot is taken, so a run sees a
//! stable view even while the archiver keeps copying files in.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use crate::error::{Result, WalCheckError};
use crate::segment::{SegmentCodec, SegmentId, Timeline};

/// A segment present in the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedSegment {
    pub id: SegmentId,
    pub file_name: String,
    pub modified: SystemTime,
}

/// In-memory view of an archive directory
#[derive(Debug, Default)]
pub struct ArchiveSnapshot {
    /// Segments keyed by (timeline, linear sequence)
    segments: BTreeMap<(Timeline, u64), ArchivedSegment>,

    /// Files carrying the suffix that were not usable segments
    skipped: usize,
}

impl ArchiveSnapshot {
    /// Read the directory at `dir`
    ///
    /// Files that cannot be stat'ed are left out, which makes them count
    /// as missing segments.
    pub fn load(dir: &Path, codec: &SegmentCodec) -> Result<Self> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(WalCheckError::DirectoryMissing(dir.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut listed = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "failed to read directory entry");
                    continue;
                }
            };

            let file_name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!(file = ?raw, "skipping non UTF-8 file name");
                    continue;
                }
            };

            // Follow symlinks: archives are sometimes linked in from elsewhere
            let modified = match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => meta.modified(),
                Ok(_) => continue,
                Err(e) => Err(e),
            };
            match modified {
                Ok(modified) => listed.push((file_name, modified)),
                Err(e) => debug!(file = %file_name, error = %e, "cannot stat file, treating as missing"),
            }
        }

        Ok(Self::from_entries(listed, codec))
    }

    /// Build a snapshot from (file name, modification time) pairs
    pub fn from_entries<I, S>(entries: I, codec: &SegmentCodec) -> Self
    where
        I: IntoIterator<Item = (S, SystemTime)>,
        S: Into<String>,
    {
        let mut listed: Vec<(String, SystemTime)> = entries
            .into_iter()
            .map(|(name, modified)| (name.into(), modified))
            .collect();
        // Directory order is arbitrary; sort so duplicates resolve the same way every run
        listed.sort();

        let mut snapshot = Self::default();
        for (file_name, modified) in listed {
            if !file_name.ends_with(codec.suffix()) {
                continue;
            }

            let id = match codec.decode(&file_name) {
                Ok(id) => id,
                Err(e) => {
                    debug!(file = %file_name, error = %e, "skipping file that is not a WAL segment");
                    snapshot.skipped += 1;
                    continue;
                }
            };

            let canonical = codec.file_name(&id) == file_name;
            let segment = ArchivedSegment { id, file_name, modified };
            match snapshot.segments.entry((id.timeline, id.to_linear())) {
                Entry::Vacant(slot) => {
                    slot.insert(segment);
                }
                Entry::Occupied(mut slot) => {
                    debug!(
                        file = %segment.file_name,
                        existing = %slot.get().file_name,
                        "duplicate segment position"
                    );
                    if canonical {
                        slot.insert(segment);
                    }
                    snapshot.skipped += 1;
                }
            }
        }

        snapshot
    }

    /// Number of segments in the snapshot
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of files ignored because they were not usable segments
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Look up the segment at `sequence` on `timeline`
    pub fn get(&self, timeline: Timeline, sequence: u64) -> Option<&ArchivedSegment> {
        self.segments.get(&(timeline, sequence))
    }

    /// Modification time of the segment at `sequence`, if archived
    pub fn modified(&self, timeline: Timeline, sequence: u64) -> Option<SystemTime> {
        self.get(timeline, sequence).map(|segment| segment.modified)
    }

    /// First archived segment in `start..=end` on `timeline`
    pub fn first_in_range(&self, timeline: Timeline, start: u64, end: u64) -> Option<&ArchivedSegment> {
        if start > end {
            return None;
        }
        self.segments
            .range((timeline, start)..=(timeline, end))
            .next()
            .map(|(_, segment)| segment)
    }

    /// Segment with the earliest modification time (ties go to the lower name)
    pub fn oldest(&self) -> Option<&ArchivedSegment> {
        self.segments
            .values()
            .min_by(|a, b| (a.modified, &a.file_name).cmp(&(b.modified, &b.file_name)))
    }

    /// Segment with the latest modification time (ties go to the higher name)
    pub fn newest(&self) -> Option<&ArchivedSegment> {
        self.segments
            .values()
            .max_by(|a, b| (a.modified, &a.file_name).cmp(&(b.modified, &b.file_name)))
    }

    /// All segments in (timeline, sequence) order
    pub fn segments(&self) -> impl Iterator<Item = &ArchivedSegment> {
        self.segments.values()
    }
}
