//! Segment Name Module
//!
//! Maps archived WAL file names to positions in a linear sequence and back.
//!
//! ## Responsibilities
//! - Strict fixed-width decoding of segment names
//! - Timeline identity and mismatch detection
//! - Linear sequence numbers the walker iterates over
//! - Reconstructing the file name for any sequence number
//!
//! ## Name Format
//! ```text
//! ┌────────────┬────────────┬────────────┬────────┐
//! │Timeline (8)│ Logical (8)│Physical (8)│ Suffix │
//! └────────────┴────────────┴────────────┴────────┘
//!   00000001     0000002A     000000FF     .gz
//! ```
//!
//! Only the low byte of the physical field is used: segments run 00..FF
//! and the logical id advances at each 0x100 boundary. The linear sequence
//! number is therefore `logical << 8 | segment`.

mod name;
mod timeline;

pub use name::{SegmentCodec, SegmentId, NAME_LEN, SEGMENTS_PER_LOGICAL};
pub use timeline::{Timeline, TimelineMismatch};
