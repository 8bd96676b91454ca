//! Configuration for walcheck
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, WalCheckError};

/// Default gap threshold: one day
pub const DEFAULT_GAP_THRESHOLD_SECS: u64 = 24 * 3600;

/// Configuration for checking one archive directory
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Archive Configuration
    // -------------------------------------------------------------------------
    /// Directory the archiver copies WAL segments into
    pub archive_dir: PathBuf,

    /// Extension appended to every archived segment name (e.g. ".gz").
    /// Empty when segments are archived under their bare names.
    pub wal_suffix: String,

    // -------------------------------------------------------------------------
    // Classification Configuration
    // -------------------------------------------------------------------------
    /// A gap whose far edge arrived more than this long after the last good
    /// segment is CRITICAL; anything shorter is a WARNING
    pub gap_threshold: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_dir: PathBuf::from("./wal_archive"),
            wal_suffix: String::new(),
            gap_threshold: Duration::from_secs(DEFAULT_GAP_THRESHOLD_SECS),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings that can never match an archived segment
    pub fn validate(&self) -> Result<()> {
        if self.wal_suffix.contains(|c| c == '/' || c == '\\') {
            return Err(WalCheckError::Config(format!(
                "WAL suffix {:?} must not contain a path separator",
                self.wal_suffix
            )));
        }
        if self.archive_dir.as_os_str().is_empty() {
            return Err(WalCheckError::Config("archive directory is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the archive directory to inspect
    pub fn archive_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.archive_dir = path.into();
        self
    }

    /// Set the suffix stripped from (and appended to) segment names
    pub fn wal_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.wal_suffix = suffix.into();
        self
    }

    /// Set the gap threshold
    pub fn gap_threshold(mut self, threshold: Duration) -> Self {
        self.config.gap_threshold = threshold;
        self
    }

    /// Set the gap threshold (in seconds)
    pub fn gap_threshold_secs(self, secs: u64) -> Self {
        self.gap_threshold(Duration::from_secs(secs))
    }

    pub fn build(self) -> Config {
        self.config
    }
}
