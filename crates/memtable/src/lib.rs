//! # Memtable
//!
//! An in-memory, sorted, mutable write buffer for the RiptideKV storage engine.
//!
//! The memtable is the first point of contact for every write operation. It
//! buffers recent writes in a sorted structure (`BTreeMap`) before they are
//! flushed to an immutable on-disk segment.
//!
//! ## Key properties
//! - **Sorted order**: entries are always in ascending key order (required for
//!   segment flush).
//! - **Approximate size tracking**: `total_bytes` tracks key + value bytes so
//!   the engine can decide when a flush is due. Updating an existing key only
//!   moves `total_bytes` by the delta in value length; inserting a new key adds
//!   the full `key.len() + value.len()`.
//!
//! ## Example
//! ```rust
//! use memtable::Memtable;
//!
//! let mut m = Memtable::new();
//! m.insert("hello".to_string(), "world".to_string());
//! assert_eq!(m.find("hello"), Some("world".to_string()));
//! ```

use std::collections::BTreeMap;

/// An ordered, in-memory write buffer backed by a `BTreeMap`.
///
/// Unlike a memtable built for a tombstone-aware LSM tree, this one has no
/// concept of delete: every key present in the map has a live value.
#[derive(Debug, Default)]
pub struct Memtable {
    map: BTreeMap<String, String>,
    total_bytes: usize,
}

impl Memtable {
    /// Creates a new, empty memtable.
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            total_bytes: 0,
        }
    }

    /// Inserts or updates a key-value pair.
    ///
    /// On update, `total_bytes` moves by the delta in value length only (the
    /// key was already counted when it first appeared). On insert of a new
    /// key, `total_bytes` grows by `key.len() + value.len()`.
    pub fn insert(&mut self, key: String, value: String) {
        match self.map.get(&key) {
            Some(old) => {
                let old_len = old.len();
                let new_len = value.len();
                if new_len >= old_len {
                    self.total_bytes += new_len - old_len;
                } else {
                    self.total_bytes -= old_len - new_len;
                }
            }
            None => {
                self.total_bytes += key.len() + value.len();
            }
        }
        self.map.insert(key, value);
    }

    /// Looks up a key, returning a clone of its value if present.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns all entries in ascending key order.
    pub fn in_order(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the memtable holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the running byte-size accounting described on the struct.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Returns what `total_bytes()` would become if `key`/`value` were
    /// inserted next, without mutating the memtable.
    ///
    /// Lets the engine check the flush threshold *before* committing a
    /// write, since checking after the fact can never flush the write that
    /// just crossed it.
    #[must_use]
    pub fn prospective_total_bytes(&self, key: &str, value: &str) -> usize {
        match self.map.get(key) {
            Some(old) => {
                let old_len = old.len();
                let new_len = value.len();
                if new_len >= old_len {
                    self.total_bytes + (new_len - old_len)
                } else {
                    self.total_bytes - (old_len - new_len)
                }
            }
            None => self.total_bytes + key.len() + value.len(),
        }
    }

    /// Removes all entries and resets `total_bytes` to zero.
    pub fn clear(&mut self) {
        self.map.clear();
        self.total_bytes = 0;
    }
}
