//! Pairwise segment merge, used by compaction.
//!
//! Exactly two adjacent segments are merged per call: the older segment's
//! file is atomically replaced with the merged content, and the newer
//! segment's file is deleted. This is a deliberately narrower operation than
//! a full N-way merge of every segment at once — compaction runs it once per
//! call, reducing the segment count by exactly one each time.

use std::fs;
use std::path::Path;

use crate::reader::read_records;
use crate::writer::{fsync_parent, write_segment};
use crate::SegmentError;

/// Merges `newer_path` into `older_path`, keeping the newer value whenever
/// both segments hold the same key. `older_path` is overwritten atomically
/// with the merged result; `newer_path` is deleted once the merge succeeds.
pub fn merge_pair(older_path: &Path, newer_path: &Path) -> Result<(), SegmentError> {
    let older = read_records(older_path)?;
    let newer = read_records(newer_path)?;

    let mut merged: Vec<(String, String)> = Vec::with_capacity(older.len() + newer.len());
    let mut oi = older.into_iter().peekable();
    let mut ni = newer.into_iter().peekable();

    loop {
        match (oi.peek(), ni.peek()) {
            (Some((ok, _)), Some((nk, _))) => {
                if ok < nk {
                    merged.push(oi.next().unwrap());
                } else if nk < ok {
                    merged.push(ni.next().unwrap());
                } else {
                    // Same key in both segments: the newer segment wins.
                    oi.next();
                    merged.push(ni.next().unwrap());
                }
            }
            (Some(_), None) => merged.push(oi.next().unwrap()),
            (None, Some(_)) => merged.push(ni.next().unwrap()),
            (None, None) => break,
        }
    }

    let borrowed: Vec<(&str, &str)> = merged
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    // write_segment's sparsity=0 means "do not sample" — the caller rebuilds
    // the sparse index for the whole database separately after compaction
    // (see the engine's index-repopulation pass), so there is no point
    // sampling here.
    write_segment(older_path, 0, borrowed.into_iter())?;

    fs::remove_file(newer_path)?;
    fsync_parent(newer_path)?;

    Ok(())
}
