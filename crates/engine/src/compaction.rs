//! Compaction: drop memtable-shadowed keys from every segment, merge
//! adjacent segments down to one, and repopulate the sparse index.
//!
//! The two phases are independent operations that happen to run back to
//! back: shadowing never changes the segment *count* (only content, and
//! only empties a segment if every one of its keys was shadowed), while
//! merging never looks at the memtable at all.

use std::collections::HashSet;
use std::fs;

use crate::error::EngineError;
use crate::Engine;

impl Engine {
    /// Runs the full compaction algorithm: memtable-shadowing, then
    /// pairwise merge, then index repopulation.
    pub fn compact(&mut self) -> Result<(), EngineError> {
        self.shadow_memtable_keys()?;
        self.merge_all_segments()?;
        self.repopulate_index()?;
        self.save_metadata()?;
        Ok(())
    }

    /// Drops every key currently in the memtable from every segment — the
    /// memtable's copy is newer and would shadow it on read anyway, so the
    /// on-disk copy is dead weight. A segment left empty by this is deleted
    /// and its id dropped from the segment list.
    fn shadow_memtable_keys(&mut self) -> Result<(), EngineError> {
        if self.mem.is_empty() {
            return Ok(());
        }

        let shadow: HashSet<String> = self.mem.in_order().map(|(k, _)| k.to_string()).collect();
        let segments = std::mem::take(&mut self.segments);
        let mut kept = Vec::with_capacity(segments.len());
        for seg in segments {
            let path = self.segments_dir.join(&seg);
            let now_empty = segment::delete_keys(&path, &shadow)?;
            if now_empty {
                fs::remove_file(&path)?;
            } else {
                kept.push(seg);
            }
        }
        self.segments = kept;
        Ok(())
    }

    /// Repeatedly merges the two oldest remaining segments until one
    /// remains. Each call to `merge_pair` folds exactly one segment into
    /// its older neighbor, so the loop runs `segments.len() - 1` times.
    fn merge_all_segments(&mut self) -> Result<(), EngineError> {
        while self.segments.len() > 1 {
            let older = self.segments[0].clone();
            let newer = self.segments[1].clone();
            let older_path = self.segments_dir.join(&older);
            let newer_path = self.segments_dir.join(&newer);
            segment::merge::merge_pair(&older_path, &newer_path)?;
            self.segments.remove(1);
        }
        Ok(())
    }

    /// Clears the sparse index and rebuilds it by walking every surviving
    /// segment oldest-to-newest, sampling every `sparsity`-th record the
    /// same way a flush does.
    pub(crate) fn repopulate_index(&mut self) -> Result<(), EngineError> {
        self.index.clear();
        let sparsity = self.sparsity();
        for seg in self.segments.clone() {
            let path = self.segments_dir.join(&seg);
            let records = segment::read_records(&path)?;
            let mut offset: u64 = 0;
            for (position, (key, value)) in records.iter().enumerate() {
                let position = position + 1;
                if sparsity > 0 && position % sparsity == 0 {
                    self.index.add(key, &seg, offset);
                }
                offset += (key.len() + value.len() + 2) as u64;
            }
        }
        Ok(())
    }
}
