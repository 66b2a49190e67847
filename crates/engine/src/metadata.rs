//! # Metadata snapshot
//!
//! Tracks everything the engine needs to resume after a restart without
//! rescanning every segment from scratch: which segments exist, which one is
//! the current flush target, the bloom filter's sizing parameters, and the
//! sparse index.
//!
//! ## File format
//!
//! A single text file, `database_metadata`, inside the segments directory.
//! One directive per line:
//!
//! ```text
//! current_segment:test_file-3
//! bf_false_pos:0.01
//! bf_num_items:128
//! segment:test_file-1
//! segment:test_file-2
//! segment:test_file-3
//! index:test_file-1:24:jkl
//! index:test_file-1:56:vwx
//! ```
//!
//! Lines starting with `#` are comments. `index` lines carry the segment and
//! byte offset before the key so the key itself (the last field) can contain
//! any character the segment format allows.
//!
//! ## Crash safety
//!
//! Rewritten atomically: written to a `.tmp` file beside the target, fsynced,
//! then renamed over the existing snapshot — the same discipline segment
//! writes use.

use index::SparseIndex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// Name of the metadata file within the segments directory.
pub const METADATA_FILENAME: &str = "database_metadata";

/// In-memory representation of the metadata snapshot.
#[derive(Debug, Clone)]
pub struct MetadataSnapshot {
    pub current_segment: String,
    pub segments: Vec<String>,
    pub bf_false_pos: f64,
    pub bf_num_items: usize,
    pub index: Vec<(String, String, u64)>,
}

/// Loads the snapshot from `segments_dir/database_metadata`, or returns
/// `None` if no snapshot exists yet (fresh database).
pub fn load(segments_dir: &Path) -> Result<Option<MetadataSnapshot>, EngineError> {
    let path = segments_dir.join(METADATA_FILENAME);
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(&path)?;
    let reader = BufReader::new(file);

    let mut current_segment = String::new();
    let mut segments = Vec::new();
    let mut bf_false_pos = 0.01;
    let mut bf_num_items = 1usize;
    let mut index = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (field, rest) = trimmed.split_once(':').ok_or_else(|| {
            EngineError::Corrupt(format!("metadata line missing ':': {trimmed:?}"))
        })?;
        match field {
            "current_segment" => current_segment = rest.to_string(),
            "bf_false_pos" => {
                bf_false_pos = rest
                    .parse()
                    .map_err(|_| EngineError::Corrupt(format!("bad bf_false_pos: {rest}")))?;
            }
            "bf_num_items" => {
                bf_num_items = rest
                    .parse()
                    .map_err(|_| EngineError::Corrupt(format!("bad bf_num_items: {rest}")))?;
            }
            "segment" => segments.push(rest.to_string()),
            "index" => {
                let mut parts = rest.splitn(3, ':');
                let segment = parts
                    .next()
                    .ok_or_else(|| EngineError::Corrupt("index line missing segment".into()))?;
                let offset = parts
                    .next()
                    .ok_or_else(|| EngineError::Corrupt("index line missing offset".into()))?;
                let key = parts
                    .next()
                    .ok_or_else(|| EngineError::Corrupt("index line missing key".into()))?;
                let offset: u64 = offset
                    .parse()
                    .map_err(|_| EngineError::Corrupt(format!("bad index offset: {offset}")))?;
                index.push((key.to_string(), segment.to_string(), offset));
            }
            other => {
                return Err(EngineError::Corrupt(format!(
                    "unknown metadata field: {other}"
                )))
            }
        }
    }

    Ok(Some(MetadataSnapshot {
        current_segment,
        segments,
        bf_false_pos,
        bf_num_items,
        index,
    }))
}

/// Persists `snapshot` to `segments_dir/database_metadata`, atomically.
pub fn save(segments_dir: &Path, snapshot: &MetadataSnapshot) -> Result<(), EngineError> {
    let path = segments_dir.join(METADATA_FILENAME);
    let tmp_path: PathBuf = path.with_extension("tmp");

    {
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        writeln!(f, "# RiptideKV metadata snapshot")?;
        writeln!(f, "current_segment:{}", snapshot.current_segment)?;
        writeln!(f, "bf_false_pos:{}", snapshot.bf_false_pos)?;
        writeln!(f, "bf_num_items:{}", snapshot.bf_num_items)?;
        for s in &snapshot.segments {
            writeln!(f, "segment:{s}")?;
        }
        for (key, segment, offset) in &snapshot.index {
            writeln!(f, "index:{segment}:{offset}:{key}")?;
        }
        f.flush()?;
        f.sync_all()?;
    }

    fs::rename(&tmp_path, &path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            File::open(parent)?.sync_all()?;
        }
    }

    Ok(())
}

/// Builds a [`MetadataSnapshot`] from the engine's live state.
pub fn snapshot_of(
    current_segment: &str,
    segments: &[String],
    bf_params: (usize, f64),
    sparse_index: &SparseIndex,
) -> MetadataSnapshot {
    let (num_items, false_pos) = bf_params;
    MetadataSnapshot {
        current_segment: current_segment.to_string(),
        segments: segments.to_vec(),
        bf_false_pos: false_pos,
        bf_num_items: num_items,
        index: sparse_index
            .in_order()
            .map(|(k, e)| (k.to_string(), e.segment.clone(), e.offset))
            .collect(),
    }
}
