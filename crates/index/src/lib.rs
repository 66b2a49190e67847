//! # Sparse index
//!
//! An in-memory, ordered map from a sampled key to the `(segment, offset)`
//! location of that key's record on disk. Populated during a memtable flush
//! (one entry roughly every `sparsity` records) and consulted on every read
//! to jump close to the target key before falling back to a short linear
//! scan.
//!
//! When the same key is indexed by more than one segment (this can happen
//! across successive flushes, before compaction removes the older copy), the
//! later `add` call wins — callers are expected to add entries in oldest-to-
//! newest segment order, which is exactly what flush and index repopulation
//! both do, so `find`/`floor` always resolve to the entry from the newest
//! segment.

use std::collections::BTreeMap;

/// Where a key's record lives: which segment, and at what byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub segment: String,
    pub offset: u64,
}

/// The sparse index itself.
#[derive(Debug, Default)]
pub struct SparseIndex {
    map: BTreeMap<String, IndexEntry>,
}

impl SparseIndex {
    /// Creates a new, empty sparse index.
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Records that `key` can be found in `segment` at `offset`.
    ///
    /// Overwrites any existing entry for `key` — see the module-level note on
    /// call ordering.
    pub fn add(&mut self, key: &str, segment: &str, offset: u64) {
        self.map.insert(
            key.to_string(),
            IndexEntry {
                segment: segment.to_string(),
                offset,
            },
        );
    }

    /// Returns the exact entry for `key`, if indexed.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&IndexEntry> {
        self.map.get(key)
    }

    /// Returns the entry for the largest indexed key `<= key`, if any.
    ///
    /// This is the primary read-path operation: it gives the engine a
    /// segment and byte offset to seek to before linearly scanning forward
    /// for the exact key.
    #[must_use]
    pub fn floor(&self, key: &str) -> Option<(&str, &IndexEntry)> {
        self.map
            .range(..=key.to_string())
            .next_back()
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if `key` is indexed exactly.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns all entries in ascending key order.
    pub fn in_order(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of indexed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every entry. Used before a full index repopulation after
    /// compaction invalidates existing offsets.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
