//! # walcheck
//!
//! A monitoring check for PostgreSQL WAL archives:
//! - Decodes archived segment names into one linear sequence
//! - Walks every position between the oldest and newest segment
//! - Classifies the first gap by how long the archive went without a segment
//! - Reports OK / WARNING / CRITICAL with monitoring-plugin exit codes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    walcheck binary                          │
//! │              (one check per --directory)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Verifier                               │
//! │        (snapshot → timeline check → walk → outcome)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Walker    │          │ Classifier  │
//!   │ (sequence)  │          │ (gap age)   │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Snapshot   │          │   Report    │
//!   │ + Segment   │          │ (severity)  │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod segment;
pub mod archive;
pub mod walker;
pub mod classifier;
pub mod report;
pub mod verifier;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WalCheckError, Result};
pub use config::Config;
pub use report::{Outcome, Severity, Status};
pub use verifier::{verify_many, Report, Verifier};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of walcheck
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
