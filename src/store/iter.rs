//! Lazy sorted iterator
//!
//! Single-pass iteration over all key groups in ascending key order,
//! loading pages on demand and deleting each page file once its last key
//! has been served.

use std::collections::btree_set;

use crate::codec::BinRecord;
use crate::error::{Result, SpillError};
use crate::page::{page_for, PageBuffer, PageFileManager};

/// Iterator over key groups in ascending key order.
///
/// Walks the Key Index; on a page transition the next page is loaded and
/// the just-consumed page's file is deleted (deletion lags by one page so a
/// page is never removed before its own last key is served). The final
/// page's file is deleted when the key sequence is exhausted.
pub struct SortedGroupIter<'a> {
    /// Page file manager for loads and deletes
    files: &'a mut PageFileManager,

    /// Remaining keys, ascending
    keys: btree_set::Iter<'a, i64>,

    /// Keys-per-page granularity
    page_capacity: i64,

    /// Page currently backing iteration
    current: Option<PageBuffer>,
}

impl<'a> SortedGroupIter<'a> {
    pub(super) fn new(
        files: &'a mut PageFileManager,
        keys: btree_set::Iter<'a, i64>,
        page_capacity: i64,
    ) -> Self {
        Self {
            files,
            keys,
            page_capacity,
            current: None,
        }
    }
}

impl Iterator for SortedGroupIter<'_> {
    /// (key, records sharing that key); records are in ingestion order
    type Item = Result<(i64, Vec<BinRecord>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = match self.keys.next() {
            Some(&key) => key,
            None => {
                // Last key served: the final page file can go too.
                if let Some(page) = self.current.take() {
                    self.files.delete(page.page_id());
                }
                return None;
            }
        };

        let page_id = page_for(key, self.page_capacity);
        let needs_switch = self
            .current
            .as_ref()
            .map_or(true, |page| page.page_id() != page_id);

        if needs_switch {
            let loaded = match self.files.load(page_id) {
                Ok(page) => page,
                Err(e) => return Some(Err(e)),
            };
            if let Some(consumed) = self.current.take() {
                self.files.delete(consumed.page_id());
            }
            self.current = Some(loaded);
        }

        // Every indexed key was flushed into its page; a miss means the
        // scratch directory was tampered with or a page write was lost.
        let group = self
            .current
            .as_mut()
            .and_then(|page| page.take_group(key));

        match group {
            Some(records) => Some(Ok((key, records))),
            None => Some(Err(SpillError::PageCorruption(format!(
                "key {} missing from page {}",
                key, page_id
            )))),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}
