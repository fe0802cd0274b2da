//! Binary codec for bin records and key-group runs
//!
//! Defines the on-disk page file format and the record payload encoding.
//! All integers are big-endian.
//!
//! ## Page File Format
//!
//! A page file is a sequence of key-group runs, repeated until end of file.
//! There is no header, footer, or checksum: page files are transient
//! scratch data, and any malformed content is treated as fatal corruption.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Run 1                                       │
//! │ ┌─────────┬───────────┬───────────────────┐ │
//! │ │ Key (8) │ Count (4) │ Count × Record    │ │
//! │ └─────────┴───────────┴───────────────────┘ │
//! ├─────────────────────────────────────────────┤
//! │ Run 2                                       │
//! │ ┌─────────┬───────────┬───────────────────┐ │
//! │ │ Key (8) │ Count (4) │ Count × Record    │ │
//! │ └─────────┴───────────┴───────────────────┘ │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ### Record Encoding
//! ```text
//! ┌─────────────┬──────────────────┬──────────────────────┐
//! │ NumObs (4)  │ FeatureCount (4) │ FeatureCount × f32   │
//! └─────────────┴──────────────────┴──────────────────────┘
//! ```
//!
//! The record's key is carried by the enclosing run header, not repeated
//! per record.

mod record;
mod run;

pub use record::BinRecord;
pub use run::{read_groups, write_groups};

// =============================================================================
// Shared Constants (used by record and run codecs)
// =============================================================================

/// Run header size: Key (8) + Count (4) = 12 bytes
pub(crate) const RUN_HEADER_SIZE: usize = 12;

/// Upper bound on the per-record feature count accepted by the decoder.
/// A count beyond this is treated as corruption, not data.
pub(crate) const MAX_FEATURES: i32 = 1 << 16;
