//! Key Index
//!
//! Ordered set of all distinct bin indices ever ingested. Keys only, never
//! records, so the post-completion memory footprint is bounded by the number
//! of distinct keys. Grows monotonically; drives the read-phase iteration
//! order.

use std::collections::btree_set;
use std::collections::BTreeSet;

/// In-memory ordered set of all distinct keys observed by the store
#[derive(Debug, Default)]
pub struct KeyIndex {
    keys: BTreeSet<i64>,
}

impl KeyIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key; returns true if it was not present before
    pub fn insert(&mut self, key: i64) -> bool {
        self.keys.insert(key)
    }

    /// Whether a key has been observed
    pub fn contains(&self, key: i64) -> bool {
        self.keys.contains(&key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys have been observed
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate keys in ascending order
    pub fn iter(&self) -> btree_set::Iter<'_, i64> {
        self.keys.iter()
    }
}
