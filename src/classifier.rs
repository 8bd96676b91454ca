//! Gap Classifier
//!
//! Maps the time the archive went without a segment to a severity.

use std::time::{Duration, SystemTime};

use crate::config::Config;
use crate::report::Severity;

/// Time between the last good segment and the segment closing the gap.
/// Clamped to zero when the far edge is older than the last good segment.
pub fn elapsed_between(last_good: SystemTime, gap_end: SystemTime) -> Duration {
    gap_end.duration_since(last_good).unwrap_or(Duration::ZERO)
}

/// CRITICAL once the gap spans more than `threshold`, WARNING otherwise
pub fn classify(gap_end: SystemTime, last_good: SystemTime, threshold: Duration) -> Severity {
    if elapsed_between(last_good, gap_end) > threshold {
        Severity::Critical
    } else {
        Severity::Warning
    }
}

/// [`classify`] bound to a configured threshold
#[derive(Debug, Clone, Copy)]
pub struct GapClassifier {
    threshold: Duration,
}

impl GapClassifier {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.gap_threshold)
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn classify(&self, gap_end: SystemTime, last_good: SystemTime) -> Severity {
        classify(gap_end, last_good, self.threshold)
    }
}
