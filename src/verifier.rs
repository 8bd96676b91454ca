//! Verifier Module
//!
//! Drives one archive check from directory listing to outcome.
//!
//! ## Responsibilities
//! - Snapshot the archive directory
//! - Pick the oldest and newest segments and check they share a timeline
//! - Walk every sequence number between them and classify the first gap
//! - Check several directories side by side

use std::path::PathBuf;
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::archive::ArchiveSnapshot;
use crate::classifier::{elapsed_between, GapClassifier};
use crate::config::Config;
use crate::error::WalCheckError;
use crate::report::{Gap, Outcome, Severity};
use crate::segment::{SegmentCodec, SegmentId, Timeline};
use crate::walker::SequenceWalker;

/// Checks one archive directory
#[derive(Debug, Clone)]
pub struct Verifier {
    config: Config,
    codec: SegmentCodec,
    classifier: GapClassifier,
}

impl Verifier {
    pub fn new(config: Config) -> Self {
        let codec = SegmentCodec::new(config.wal_suffix.clone());
        let classifier = GapClassifier::from_config(&config);
        Self { config, codec, classifier }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the check against the configured directory
    ///
    /// Steps:
    /// 1. Snapshot the directory (missing / unreadable end here)
    /// 2. Hand the snapshot to [`Verifier::check`]
    pub fn run(&self) -> Outcome {
        let dir = &self.config.archive_dir;

        let snapshot = match ArchiveSnapshot::load(dir, &self.codec) {
            Ok(snapshot) => snapshot,
            Err(WalCheckError::DirectoryMissing(path)) => return Outcome::DirectoryMissing(path),
            Err(e) => {
                return Outcome::DirectoryUnreadable {
                    dir: dir.clone(),
                    reason: e.to_string(),
                }
            }
        };

        debug!(
            dir = %dir.display(),
            segments = snapshot.len(),
            skipped = snapshot.skipped(),
            "archive snapshot taken"
        );

        let outcome = self.check(&snapshot);
        info!(dir = %dir.display(), severity = %outcome.severity(), "archive check finished");
        outcome
    }

    /// Check an already-taken snapshot
    pub fn check(&self, snapshot: &ArchiveSnapshot) -> Outcome {
        match (snapshot.oldest(), snapshot.newest()) {
            (Some(oldest), Some(newest)) => {
                verify_sequence(snapshot, &self.codec, &self.classifier, &oldest.id, &newest.id)
            }
            _ => Outcome::DirectoryEmpty(self.config.archive_dir.clone()),
        }
    }
}

/// Verify that every segment between `oldest` and `newest` is archived
pub fn verify_sequence(
    snapshot: &ArchiveSnapshot,
    codec: &SegmentCodec,
    classifier: &GapClassifier,
    oldest: &SegmentId,
    newest: &SegmentId,
) -> Outcome {
    let timeline = match Timeline::shared(oldest.timeline, newest.timeline) {
        Ok(timeline) => timeline,
        Err(mismatch) => {
            warn!(timelines = %mismatch, "oldest and newest segments are on different timelines");
            return Outcome::TimelineMismatch(mismatch);
        }
    };

    // Modification order and name order can disagree after a restore
    let (from, to) = if oldest.to_linear() <= newest.to_linear() {
        (oldest.to_linear(), newest.to_linear())
    } else {
        (newest.to_linear(), oldest.to_linear())
    };

    let walker = SequenceWalker::new(snapshot, timeline);
    walk_range(&walker, codec, classifier, from, to)
}

/// Walk `from..=to` and report the first gap
///
/// A missing segment is classified as soon as the segment closing the gap
/// is found. When nothing later in range exists the gap stays open, the
/// walk carries on to `to` and the open gap is named in the OK outcome.
pub fn walk_range(
    walker: &SequenceWalker<'_>,
    codec: &SegmentCodec,
    classifier: &GapClassifier,
    from: u64,
    to: u64,
) -> Outcome {
    let timeline = walker.timeline();
    let name_of = |sequence: u64| {
        codec
            .name_for_sequence(timeline, sequence)
            .unwrap_or_else(|_| format!("{}:{:#X}", timeline, sequence))
    };
    let gap_at = |first_missing: u64, next: u64, last_good: SystemTime, next_modified: SystemTime| {
        let gap = Gap {
            first_missing: name_of(first_missing),
            next_present: name_of(next),
            elapsed: elapsed_between(last_good, next_modified),
            threshold: classifier.threshold(),
            severity: classifier.classify(next_modified, last_good),
        };
        warn!(
            first_missing = %gap.first_missing,
            next_present = %gap.next_present,
            elapsed_secs = gap.elapsed.as_secs(),
            severity = %gap.severity,
            "gap in WAL archive"
        );
        Outcome::SequenceGap(gap)
    };

    let mut last_good: Option<SystemTime> = None;
    let mut open_gap: Option<u64> = None;
    let mut checked = 0u64;

    for step in walker.walk(from, to) {
        checked += 1;
        match step.modified {
            Some(modified) => last_good = Some(modified),
            None => {
                // Nothing to measure a gap from until a good segment is seen.
                // Once a gap is open, every later position is missing too.
                let Some(previous) = last_good else { continue };
                if open_gap.is_some() {
                    continue;
                }

                match walker.find_next_existing(step.sequence.saturating_add(1), to) {
                    Some((next, next_modified)) => {
                        return gap_at(step.sequence, next, previous, next_modified);
                    }
                    None => {
                        warn!(
                            first_missing = %name_of(step.sequence),
                            "no archived segment closes this gap"
                        );
                        open_gap = Some(step.sequence);
                    }
                }
            }
        }
    }

    Outcome::Healthy {
        checked,
        first: name_of(from),
        last: name_of(to),
        open_gap: open_gap.map(name_of),
    }
}

// =============================================================================
// Multiple Directories
// =============================================================================

/// Outcome of checking one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub archive_dir: PathBuf,
    pub outcome: Outcome,
}

/// Check several archive directories, one scoped thread each
///
/// Reports come back in the order of `configs`.
pub fn verify_many(configs: &[Config]) -> Vec<Report> {
    crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = configs
            .iter()
            .map(|config| {
                let handle = scope.spawn(move |_| Verifier::new(config.clone()).run());
                (config, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(config, handle)| {
                let outcome = handle.join().unwrap_or_else(|_| Outcome::DirectoryUnreadable {
                    dir: config.archive_dir.clone(),
                    reason: "check panicked".to_string(),
                });
                Report {
                    archive_dir: config.archive_dir.clone(),
                    outcome,
                }
            })
            .collect()
    })
    .unwrap_or_default()
}

/// The most urgent report (first one wins on ties)
pub fn worst(reports: &[Report]) -> Option<&Report> {
    reports.iter().rev().max_by_key(|report| report.outcome.severity())
}

/// Severity of the most urgent report, OK when there are none
pub fn overall_severity(reports: &[Report]) -> Severity {
    worst(reports).map_or(Severity::Ok, |report| report.outcome.severity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const HOUR: u64 = 3600;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn verifier() -> Verifier {
        Verifier::new(Config::builder().archive_dir("/archive").build())
    }

    fn check(entries: Vec<(&str, SystemTime)>) -> Outcome {
        let verifier = verifier();
        let snapshot = ArchiveSnapshot::from_entries(entries, &SegmentCodec::default());
        verifier.check(&snapshot)
    }

    #[test]
    fn test_contiguous_is_healthy() {
        let outcome = check(vec![
            ("0000000100000000000000FE", at(0)),
            ("0000000100000000000000FF", at(10 * 24 * HOUR)),
            ("000000010000000100000000", at(20 * 24 * HOUR)),
        ]);

        match outcome {
            Outcome::Healthy { checked, first, last, open_gap } => {
                assert_eq!(checked, 3);
                assert_eq!(first, "0000000100000000000000FE");
                assert_eq!(last, "000000010000000100000000");
                assert_eq!(open_gap, None);
            }
            other => panic!("expected healthy, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let outcome = check(vec![("00000002.history", at(0))]);
        assert_eq!(outcome, Outcome::DirectoryEmpty(PathBuf::from("/archive")));
    }

    #[test]
    fn test_single_segment_is_healthy() {
        let outcome = check(vec![("000000010000000000000001", at(0))]);
        assert_eq!(outcome.severity(), Severity::Ok);
    }

    #[test]
    fn test_boundary_wrap_gap_within_threshold() {
        let outcome = check(vec![
            ("0000000100000000000000FE", at(0)),
            ("00000001000000000000010A", at(2 * HOUR)),
        ]);

        match outcome {
            Outcome::SequenceGap(gap) => {
                assert_eq!(gap.severity, Severity::Warning);
                assert_eq!(gap.first_missing, "0000000100000000000000FF");
                assert_eq!(gap.next_present, "00000001000000010000000A");
                assert_eq!(gap.elapsed, Duration::from_secs(2 * HOUR));
            }
            other => panic!("expected gap, got {:?}", other),
        }
    }

    #[test]
    fn test_gap_past_threshold_is_critical() {
        let outcome = check(vec![
            ("000000010000000000000001", at(0)),
            ("000000010000000000000003", at(25 * HOUR)),
        ]);
        assert_eq!(outcome.severity(), Severity::Critical);
        assert!(outcome.message().contains("000000010000000000000002"));
    }

    #[test]
    fn test_first_gap_only() {
        let outcome = check(vec![
            ("000000010000000000000001", at(0)),
            ("000000010000000000000003", at(HOUR)),
            ("000000010000000000000006", at(48 * HOUR)),
        ]);

        // The later, older gap is never reached
        assert_eq!(outcome.severity(), Severity::Warning);
        assert!(outcome.message().contains("000000010000000000000002"));
    }

    #[test]
    fn test_timeline_mismatch() {
        let outcome = check(vec![
            ("000000010000000000000001", at(0)),
            ("000000020000000000000001", at(HOUR)),
        ]);
        assert!(matches!(outcome, Outcome::TimelineMismatch(_)));
        assert_eq!(outcome.severity(), Severity::Warning);
    }

    #[test]
    fn test_reversed_mtime_order_still_walks_range() {
        let outcome = check(vec![
            ("000000010000000000000005", at(0)),
            ("000000010000000000000001", at(HOUR)),
        ]);
        assert!(outcome.message().contains("000000010000000000000002"));
    }

    #[test]
    fn test_unresolved_gap_completes_walk() {
        let codec = SegmentCodec::default();
        let snapshot = ArchiveSnapshot::from_entries(
            vec![("000000010000000000000001", at(0))],
            &codec,
        );
        let walker = SequenceWalker::new(&snapshot, Timeline::new(1));
        let classifier = GapClassifier::new(Duration::from_secs(86400));

        let outcome = walk_range(&walker, &codec, &classifier, 1, 4);
        assert_eq!(
            outcome,
            Outcome::Healthy {
                checked: 4,
                first: "000000010000000000000001".to_string(),
                last: "000000010000000000000004".to_string(),
                open_gap: Some("000000010000000000000002".to_string()),
            }
        );
    }

    #[test]
    fn test_gap_measured_to_first_segment_after_it() {
        let outcome = check(vec![
            ("000000010000000000000001", at(0)),
            ("000000010000000000000005", at(2 * HOUR)),
            ("000000010000000000000006", at(30 * HOUR)),
        ]);

        match outcome {
            Outcome::SequenceGap(gap) => {
                assert_eq!(gap.first_missing, "000000010000000000000002");
                assert_eq!(gap.next_present, "000000010000000000000005");
                assert_eq!(gap.elapsed, Duration::from_secs(2 * HOUR));
                assert_eq!(gap.severity, Severity::Warning);
            }
            other => panic!("expected gap, got {:?}", other),
        }
    }

    #[test]
    fn test_worst_report() {
        let reports = vec![
            Report {
                archive_dir: PathBuf::from("/a"),
                outcome: Outcome::DirectoryEmpty(PathBuf::from("/a")),
            },
            Report {
                archive_dir: PathBuf::from("/b"),
                outcome: Outcome::DirectoryMissing(PathBuf::from("/b")),
            },
        ];

        assert_eq!(worst(&reports).unwrap().archive_dir, PathBuf::from("/a"));
        assert_eq!(overall_severity(&reports), Severity::Warning);
        assert_eq!(overall_severity(&[]), Severity::Ok);
    }
}
