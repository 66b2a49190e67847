//! # Engine — RiptideKV storage engine
//!
//! The central orchestrator that ties together the [`memtable`], [`wal`],
//! [`bloom`], [`index`], and [`segment`] crates into a complete LSM-tree
//! key-value store keyed and valued by strings.
//!
//! ## Write path
//!
//! `set()` appends to the WAL, inserts into the memtable, and — if the
//! insert would carry the memtable's byte total past `threshold` — flushes
//! the memtable's prior contents to a new segment first. See [`write`].
//!
//! ## Read path
//!
//! `get()` checks the memtable, then the bloom filter, then the sparse
//! index (seek + short scan), then every segment newest-to-oldest as a
//! fallback. See [`read`].
//!
//! ## Compaction
//!
//! `compact()` drops memtable-shadowed keys from every segment, then
//! pairwise-merges adjacent segments down to one, then repopulates the
//! sparse index from the surviving segments. See [`compaction`].
//!
//! ## Recovery
//!
//! On construction, the metadata snapshot (if any) restores `segments`,
//! `current_segment`, and the sparse index; the memtable and bloom filter
//! are rebuilt by replaying the WAL and rescanning segments. See
//! [`recovery`].

mod compaction;
pub mod error;
mod metadata;
mod read;
mod recovery;
mod write;

use bloom::BloomFilter;
use index::SparseIndex;
use memtable::Memtable;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wal::AppendLog;

pub use error::EngineError;
pub use metadata::{MetadataSnapshot, METADATA_FILENAME};

/// Default bloom filter sizing used when no metadata snapshot exists yet.
pub const DEFAULT_BF_NUM_ITEMS: usize = 1000;
/// Default bloom filter false-positive rate used on a fresh database.
pub const DEFAULT_BF_FALSE_POS: f64 = 0.01;

/// The central storage engine orchestrating the memtable, WAL, bloom
/// filter, sparse index, and on-disk segments.
///
/// Not internally synchronized: callers that share an `Engine` across
/// threads are expected to wrap it in a `Mutex`, the way the `cli` crate's
/// server binary does.
pub struct Engine {
    pub(crate) mem: Memtable,
    pub(crate) wal: Arc<AppendLog>,
    pub(crate) bloom: BloomFilter,
    pub(crate) index: SparseIndex,
    /// Flushed, immutable segment ids, oldest to newest.
    pub(crate) segments: Vec<String>,
    /// The id the next flush will write to.
    pub(crate) current_segment: String,
    pub(crate) segments_dir: PathBuf,
    pub(crate) segment_prefix: String,
    /// Memtable byte-size threshold that triggers a flush.
    pub(crate) threshold: usize,
    /// Sparse index density: one sample every `threshold / sparsity_factor`
    /// records.
    pub(crate) sparsity_factor: usize,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("threshold", &self.threshold)
            .field("sparsity_factor", &self.sparsity_factor)
            .field("segments_dir", &self.segments_dir)
            .field("current_segment", &self.current_segment)
            .field("segments", &self.segments)
            .field("memtable_entries", &self.mem.len())
            .field("memtable_bytes", &self.mem.total_bytes())
            .field("index_entries", &self.index.len())
            .finish()
    }
}

impl Engine {
    /// Opens (or creates) an engine rooted at `segments_dir`, using
    /// `wal_path` for the write-ahead log.
    ///
    /// `segment_prefix` names fresh segments (`<prefix>-1`, `<prefix>-2`,
    /// ...) when no metadata snapshot exists yet; on a restart the prefix
    /// already present in the snapshot wins.
    ///
    /// # Recovery steps
    ///
    /// 1. Create `segments_dir` if missing.
    /// 2. Open (or reuse) the process-wide WAL singleton at `wal_path`.
    /// 3. Load the metadata snapshot, if any, to restore `segments`,
    ///    `current_segment`, and the sparse index.
    /// 4. Replay the WAL into a fresh memtable ([`restore_memtable`]).
    /// 5. Rebuild the bloom filter from the restored memtable's keys and a
    ///    scan of every segment.
    ///
    /// [`restore_memtable`]: Engine::restore_memtable
    pub fn new<P1: AsRef<Path>, P2: AsRef<Path>>(
        segments_dir: P1,
        wal_path: P2,
        segment_prefix: &str,
        threshold: usize,
        sparsity_factor: usize,
    ) -> Result<Self, EngineError> {
        let segments_dir = segments_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&segments_dir)?;

        let wal = AppendLog::instance(wal_path.as_ref())?;

        let snapshot = metadata::load(&segments_dir)?;
        let (current_segment, segments, bf_num_items, bf_false_pos, index_entries) =
            match snapshot {
                Some(s) => (
                    s.current_segment,
                    s.segments,
                    s.bf_num_items,
                    s.bf_false_pos,
                    s.index,
                ),
                None => (
                    format!("{segment_prefix}-1"),
                    Vec::new(),
                    DEFAULT_BF_NUM_ITEMS,
                    DEFAULT_BF_FALSE_POS,
                    Vec::new(),
                ),
            };

        let mut index = SparseIndex::new();
        for (key, segment, offset) in index_entries {
            index.add(&key, &segment, offset);
        }

        let mem = recovery::restore_memtable_from(&wal)?;
        let bloom = recovery::rebuild_bloom(
            bf_num_items,
            bf_false_pos,
            mem.in_order().map(|(k, _)| k.to_string()),
            &segments_dir,
            &segments,
        )?;

        Ok(Self {
            mem,
            wal,
            bloom,
            index,
            segments,
            current_segment,
            segments_dir,
            segment_prefix: segment_prefix.to_string(),
            threshold,
            sparsity_factor,
        })
    }

    /// The memtable byte-size threshold that triggers a flush.
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Updates the flush threshold. Useful for tuning or tests.
    pub fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;
    }

    /// The sparse-index density factor (`sparsity = threshold /
    /// sparsity_factor`).
    #[must_use]
    pub fn sparsity_factor(&self) -> usize {
        self.sparsity_factor
    }

    /// Updates the sparsity factor. Useful for tuning or tests.
    pub fn set_sparsity_factor(&mut self, sparsity_factor: usize) {
        self.sparsity_factor = sparsity_factor;
    }

    pub(crate) fn sparsity(&self) -> usize {
        self.threshold / self.sparsity_factor.max(1)
    }

    /// The flushed, immutable segment ids, oldest to newest.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The id the next flush will write to.
    #[must_use]
    pub fn current_segment(&self) -> &str {
        &self.current_segment
    }

    /// The directory holding segment files and the metadata snapshot.
    #[must_use]
    pub fn segments_dir(&self) -> &Path {
        &self.segments_dir
    }

    /// Total size of the segments directory, excluding the WAL file.
    ///
    /// Used by the `DISKUSAGE` wire command.
    pub fn disk_usage(&self) -> Result<u64, EngineError> {
        let mut total = 0u64;
        for entry in std::fs::read_dir(&self.segments_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                total += entry.metadata()?.len();
            }
        }
        Ok(total)
    }

    /// Persists the current snapshot (segments, current segment, bloom
    /// filter parameters, sparse index) to `segments_dir/database_metadata`.
    pub fn save_metadata(&self) -> Result<(), EngineError> {
        let snapshot = metadata::snapshot_of(
            &self.current_segment,
            &self.segments,
            self.bloom.params(),
            &self.index,
        );
        metadata::save(&self.segments_dir, &snapshot)
    }

    /// Loads the metadata snapshot from `segments_dir`, if one exists,
    /// without applying it to this engine.
    pub fn load_metadata(&self) -> Result<Option<MetadataSnapshot>, EngineError> {
        metadata::load(&self.segments_dir)
    }
}

#[cfg(test)]
mod tests;
