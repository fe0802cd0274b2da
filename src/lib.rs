//! # binspill
//!
//! A bounded-memory, disk-spilling ordered multimap for spatial bin
//! aggregation:
//! - Accepts an unbounded stream of keyed records in arbitrary order
//! - Spills to per-page scratch files, keeping one page in memory
//! - Streams records back grouped by key, in ascending key order
//! - Strict write-then-read lifecycle with page cleanup on consumption
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Producer                             │
//! │              ingest(records) × N, then complete()           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      SpillStore                             │
//! │        (KeyIndex + single resident PageBuffer)              │
//! └──────────┬──────────────────────────────────────┬───────────┘
//!            │ flush / reload on page change        │
//!            ▼                                      ▼
//!   ┌─────────────────┐                   ┌──────────────────┐
//!   │ PageFileManager │                   │  SortedGroupIter │
//!   │  (scratch dir)  │◄──load / delete───│   (read phase)   │
//!   └─────────────────┘                   └────────┬─────────┘
//!                                                  │
//!                                                  ▼
//!                                  (key, records) groups, ascending
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod index;
pub mod page;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SpillError};
pub use config::Config;
pub use codec::BinRecord;
pub use store::{SortedGroupIter, SpillStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of binspill
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
