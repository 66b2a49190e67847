//! Write path: `set()` and the internal `flush()`/`rotate()` it drives.
//!
//! Every write is appended to the WAL before touching the memtable, so a
//! crash between the two can never lose data. The flush threshold is
//! checked *before* the insert, not after: checking after the fact can
//! never flush the very write that crossed it, since by then that write is
//! already sitting in the memtable.

use crate::error::EngineError;
use crate::Engine;

impl Engine {
    /// Writes `key` -> `value`, flushing the memtable first if this write
    /// would carry it past the byte threshold.
    ///
    /// 1. Validate `key` and `value` (non-empty, no comma or newline).
    /// 2. If the memtable is non-empty and this insert would make
    ///    `total_bytes() >= threshold`, flush the memtable's current
    ///    contents to a new segment first.
    /// 3. Append to the WAL.
    /// 4. Insert into the memtable.
    /// 5. Add the key to the bloom filter.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), EngineError> {
        segment::format::record_line(key, value)?;

        if !self.mem.is_empty() && self.mem.prospective_total_bytes(key, value) >= self.threshold
        {
            self.flush()?;
        }

        self.wal.append(key, value)?;
        self.mem.insert(key.to_string(), value.to_string());
        self.bloom.add(key.as_bytes());
        Ok(())
    }

    /// Flushes the memtable's current contents to `current_segment`, then
    /// rotates to a fresh segment id. A no-op if the memtable is empty.
    ///
    /// Steps: write the segment file and collect sparse-index samples, add
    /// `current_segment` to the segment list, clear the memtable and the
    /// WAL, rotate `current_segment` to the next id, and persist the
    /// updated metadata snapshot.
    pub fn flush(&mut self) -> Result<(), EngineError> {
        if self.mem.is_empty() {
            return Ok(());
        }

        let segment_path = self.segments_dir.join(&self.current_segment);
        let sparsity = self.sparsity();
        let records: Vec<(&str, &str)> = self.mem.in_order().collect();
        let samples = segment::write_segment(&segment_path, sparsity, records.into_iter())?;
        for sample in samples {
            self.index.add(&sample.key, &self.current_segment, sample.offset);
        }

        if !self.segments.contains(&self.current_segment) {
            self.segments.push(self.current_segment.clone());
        }

        self.mem.clear();
        self.wal.clear()?;
        self.rotate();
        self.save_metadata()?;
        Ok(())
    }

    /// Advances `current_segment` to the next id after the one just
    /// flushed, e.g. `segment-3` -> `segment-4`.
    pub(crate) fn rotate(&mut self) {
        let next = self
            .current_segment
            .rsplit_once('-')
            .and_then(|(_, n)| n.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        self.current_segment = format!("{}-{next}", self.segment_prefix);
    }
}
