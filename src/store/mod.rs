//! Streaming Store Module
//!
//! The orchestrator that ties paging, indexing, and iteration together.
//!
//! ## Responsibilities
//! - Own the write-then-read lifecycle: `Ingesting → Completed → draining`
//! - Maintain the single resident page invariant during ingestion
//! - Flush-and-reload on page transitions so revisited pages merge with
//!   their previously persisted content
//! - Hand out the lazy sorted iterator for the read phase
//!
//! ## Lifecycle
//! ```text
//! open ──► ingest(...) × N ──► complete() ──► iter_groups() ──► drained
//!              │ page change:                      │ page change:
//!              │ store(resident), load(next)       │ load(next), delete(prev)
//! ```

mod iter;

pub use iter::SortedGroupIter;

use std::path::Path;

use crate::codec::BinRecord;
use crate::config::Config;
use crate::error::{Result, SpillError};
use crate::index::KeyIndex;
use crate::page::{page_for, PageBuffer, PageFileManager};

/// Bounded-memory ordered multimap of bin records, spilled to scratch files.
///
/// Single producer, then single consumer: `ingest` any number of times,
/// `complete` exactly once, then drain `iter_groups`. Not safe for
/// concurrent use; the surrounding pipeline must serialize calls.
pub struct SpillStore {
    /// Store configuration
    config: Config,

    /// Page file manager owning the scratch directory
    files: PageFileManager,

    /// Ordered set of all distinct keys ever ingested (keys only)
    index: KeyIndex,

    /// The single page resident in memory during ingestion
    resident: Option<PageBuffer>,

    /// Set by `complete()`; ingestion is rejected afterwards
    completed: bool,
}

impl SpillStore {
    /// Open a store with the given config.
    ///
    /// Claims the scratch directory, clearing any files left by a prior
    /// run. Fails on invalid configuration or if the directory cannot be
    /// created.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let files = PageFileManager::open(&config)?;

        Ok(Self {
            config,
            files,
            index: KeyIndex::new(),
            resident: None,
            completed: false,
        })
    }

    /// Ingest a batch of records.
    ///
    /// Records may arrive in any order, across any number of calls. Each
    /// record is routed to its page; when a record's page differs from the
    /// resident one, the resident page is flushed to disk and the new page
    /// is loaded (merging with whatever was previously persisted for it).
    ///
    /// Errors with [`SpillError::InvalidState`] after `complete()`, and
    /// with [`SpillError::KeyOutOfRange`] for a negative bin index.
    pub fn ingest<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = BinRecord>,
    {
        if self.completed {
            return Err(SpillError::InvalidState(
                "ingest called after completion".to_string(),
            ));
        }

        for record in records {
            if record.key < 0 {
                return Err(SpillError::KeyOutOfRange(record.key));
            }

            let page_id = page_for(record.key, self.config.page_capacity);

            // Page transition: persist the resident page, then pull in the
            // new page's prior on-disk content so revisits merge.
            let needs_switch = self
                .resident
                .as_ref()
                .map_or(true, |buffer| buffer.page_id() != page_id);

            if needs_switch {
                if let Some(buffer) = self.resident.take() {
                    self.files.store(&buffer)?;
                }
                self.resident = Some(self.files.load(page_id)?);
            }

            self.index.insert(record.key);
            self.resident
                .get_or_insert_with(|| PageBuffer::new(page_id))
                .push(record);
        }

        Ok(())
    }

    /// Finish ingestion: flush and release the resident page.
    ///
    /// Must be called exactly once; a second call is an
    /// [`SpillError::InvalidState`] error. After completion only the Key
    /// Index remains in memory.
    pub fn complete(&mut self) -> Result<()> {
        if self.completed {
            return Err(SpillError::InvalidState(
                "complete called more than once".to_string(),
            ));
        }

        if let Some(buffer) = self.resident.take() {
            self.files.store(&buffer)?;
        }
        self.completed = true;

        tracing::debug!(distinct_keys = self.index.len(), "ingestion completed");

        Ok(())
    }

    /// Iterate key groups in ascending key order.
    ///
    /// Valid only after `complete()`. The iterator loads each page once and
    /// deletes page files as they are consumed; abandoning it early leaves
    /// the unread page files on disk.
    pub fn iter_groups(&mut self) -> Result<SortedGroupIter<'_>> {
        if !self.completed {
            return Err(SpillError::InvalidState(
                "iteration requested before completion".to_string(),
            ));
        }

        Ok(SortedGroupIter::new(
            &mut self.files,
            self.index.iter(),
            self.config.page_capacity,
        ))
    }

    /// Number of distinct keys ingested
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// Whether no records were ever ingested
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Whether `complete()` has been called
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The scratch directory used for page files
    pub fn scratch_dir(&self) -> &Path {
        self.files.scratch_dir()
    }

    /// Page id of the currently resident page, if any
    pub fn resident_page_id(&self) -> Option<i64> {
        self.resident.as_ref().map(PageBuffer::page_id)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
