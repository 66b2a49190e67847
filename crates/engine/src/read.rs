//! Read path: `get()`.
//!
//! Checks the memtable first (freshest data), then short-circuits a miss
//! via the bloom filter, then the sparse index (seek + short forward scan),
//! then falls back to a full linear scan of every segment, newest to
//! oldest.

use crate::error::EngineError;
use crate::Engine;

impl Engine {
    /// Looks up `key`, returning its value if present anywhere in the
    /// engine (memtable, then segments).
    pub fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        if let Some(value) = self.mem.find(key) {
            return Ok(Some(value));
        }

        if !self.bloom.contains(key.as_bytes()) {
            return Ok(None);
        }

        if let Some((_, entry)) = self.index.floor(key) {
            let path = self.segments_dir.join(&entry.segment);
            if let Some(value) = segment::get_from_offset(&path, entry.offset, key)? {
                return Ok(Some(value));
            }
        }

        for seg in self.segments.iter().rev() {
            let path = self.segments_dir.join(seg);
            if let Some(value) = segment::linear_search(&path, key)? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }
}
