//! Page File Manager
//!
//! Owns the scratch directory and the mapping from page ids to files.
//!
//! ## Responsibilities
//! - Claim and clear the scratch directory on open
//! - Deterministic page id → file path mapping
//! - Load, overwrite, and delete page files with buffered sequential I/O
//! - Queue failed deletions for a best-effort retry at teardown

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::codec::{read_groups, write_groups};
use crate::config::Config;
use crate::error::{Result, SpillError};

use super::PageBuffer;

/// Manages page files inside one exclusively-owned scratch directory
pub struct PageFileManager {
    /// Scratch directory holding all page files
    scratch_dir: PathBuf,

    /// Buffer size for sequential reads and writes
    io_buffer_size: usize,

    /// Paths whose deletion failed; retried once when the manager is dropped
    pending_deletes: Vec<PathBuf>,
}

impl PageFileManager {
    /// Page file name pattern: fixed-width zero-padded decimal page id, so
    /// lexical and numeric ordering of the directory listing coincide.
    const FILE_NAME_PATTERN_WIDTH: usize = 20;

    /// Open the manager, claiming the scratch directory.
    ///
    /// Creates the directory if needed and clears any regular files left in
    /// it by a crashed prior run. Failure to create the directory is fatal;
    /// failure to remove a leftover file is logged and ignored.
    pub fn open(config: &Config) -> Result<Self> {
        fs::create_dir_all(&config.scratch_dir).map_err(|e| {
            SpillError::ScratchDir(format!(
                "could not create scratch directory {}: {}",
                config.scratch_dir.display(),
                e
            ))
        })?;

        let manager = Self {
            scratch_dir: config.scratch_dir.clone(),
            io_buffer_size: config.io_buffer_size,
            pending_deletes: Vec::new(),
        };
        manager.clear_scratch_dir()?;

        Ok(manager)
    }

    /// The scratch directory owned by this manager
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// File path for a page id
    pub fn path_for(&self, page_id: i64) -> PathBuf {
        self.scratch_dir.join(format!(
            "page-{:0width$}.bin",
            page_id,
            width = Self::FILE_NAME_PATTERN_WIDTH
        ))
    }

    /// Load a page from disk.
    ///
    /// A missing file is the normal first-visit case and yields an empty
    /// buffer. Read errors and malformed content are fatal.
    pub fn load(&self, page_id: i64) -> Result<PageBuffer> {
        let path = self.path_for(page_id);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(PageBuffer::new(page_id));
            }
            Err(e) => return Err(SpillError::Io(e)),
        };

        let mut reader = BufReader::with_capacity(self.io_buffer_size, file);
        let mut groups = BTreeMap::new();
        read_groups(&mut reader, &mut groups)?;

        tracing::debug!(
            page_id,
            groups = groups.len(),
            "loaded page from {}",
            path.display()
        );

        Ok(PageBuffer::from_groups(page_id, groups))
    }

    /// Overwrite a page file with the buffer's full contents.
    ///
    /// The file is truncated and rewritten wholesale; callers merge prior
    /// on-disk content into the buffer before flushing. No fsync: a crash
    /// mid-write loses scratch data only.
    pub fn store(&self, buffer: &PageBuffer) -> Result<()> {
        let path = self.path_for(buffer.page_id());
        let file = File::create(&path)?;

        let mut writer = BufWriter::with_capacity(self.io_buffer_size, file);
        write_groups(&mut writer, buffer.groups())?;
        writer.flush()?;

        tracing::debug!(
            page_id = buffer.page_id(),
            groups = buffer.group_count(),
            records = buffer.record_count(),
            "flushed page to {}",
            path.display()
        );

        Ok(())
    }

    /// Delete a page file, best-effort.
    ///
    /// A missing file counts as deleted. Any other failure is logged as a
    /// warning and the path queued for one more attempt at teardown; it is
    /// never an error, since leftover scratch files are a hygiene issue,
    /// not a correctness issue.
    pub fn delete(&mut self, page_id: i64) {
        let path = self.path_for(page_id);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("could not delete page file {}: {}", path.display(), e);
                self.pending_deletes.push(path);
            }
        }
    }

    /// Number of deletions still pending retry
    pub fn pending_delete_count(&self) -> usize {
        self.pending_deletes.len()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Remove regular files left in the scratch directory by a prior run
    fn clear_scratch_dir(&self) -> Result<()> {
        for entry in fs::read_dir(&self.scratch_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                if let Err(e) = fs::remove_file(&path) {
                    tracing::warn!(
                        "could not clear leftover scratch file {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }
        Ok(())
    }
}

impl Drop for PageFileManager {
    /// Retry queued deletions once; teardown failure is non-fatal and silent.
    fn drop(&mut self) {
        for path in self.pending_deletes.drain(..) {
            let _ = fs::remove_file(path);
        }
    }
}
