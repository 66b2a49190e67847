//! Restart recovery: rebuilding the memtable and bloom filter from durable
//! state (the WAL and the segment files), since neither is itself persisted.

use std::path::Path;

use bloom::BloomFilter;
use memtable::Memtable;
use wal::AppendLog;

use crate::error::EngineError;
use crate::Engine;

/// Replays `wal` into a fresh memtable.
pub(crate) fn restore_memtable_from(wal: &AppendLog) -> Result<Memtable, EngineError> {
    let mut mem = Memtable::new();
    for (key, value) in wal.replay()? {
        mem.insert(key, value);
    }
    Ok(mem)
}

/// Rebuilds a bloom filter sized for `(num_items, false_pos)` by re-adding
/// every key in `wal_keys` and every key found scanning `segments` under
/// `segments_dir`.
pub(crate) fn rebuild_bloom(
    num_items: usize,
    false_pos: f64,
    wal_keys: impl Iterator<Item = String>,
    segments_dir: &Path,
    segments: &[String],
) -> Result<BloomFilter, EngineError> {
    let mut bloom = BloomFilter::new(num_items.max(1), false_pos);
    for key in wal_keys {
        bloom.add(key.as_bytes());
    }
    for seg in segments {
        let path = segments_dir.join(seg);
        for (key, _) in segment::read_records(&path)? {
            bloom.add(key.as_bytes());
        }
    }
    Ok(bloom)
}

impl Engine {
    /// Replays the write-ahead log into a fresh memtable, replacing
    /// whatever the engine currently holds in memory.
    ///
    /// Used after a crash or an intentional discard-without-flush: the WAL
    /// is the only durable record of writes that never made it into a
    /// segment.
    pub fn restore_memtable(&mut self) -> Result<(), EngineError> {
        self.mem = restore_memtable_from(&self.wal)?;
        Ok(())
    }
}
