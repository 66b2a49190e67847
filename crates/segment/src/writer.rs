//! Segment writing: flushing a sorted sequence of records to a new segment
//! file, and rewriting a segment in place to drop a set of shadowed keys.
//!
//! Both operations write to a temporary file beside the target, fsync it,
//! and rename it into place, so a crash never leaves a half-written segment
//! visible under its final name.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::format::record_line;
use crate::reader::read_lines;
use crate::SegmentError;

/// One sparse-index sample produced while writing a segment: the key, and
/// the byte offset (within this segment) of the record that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSample {
    pub key: String,
    pub offset: u64,
}

/// Writes `records` (already sorted ascending by key, one value per key) to
/// a new segment at `path`, sampling an index entry every `sparsity`-th
/// record.
///
/// The sampling rule counts **records**, not bytes: the record at 1-indexed
/// position `p` within this segment is sampled iff `sparsity > 0 && p %
/// sparsity == 0`, and the offset recorded is the number of bytes already
/// written to this segment before that record.
pub fn write_segment<'a, I>(
    path: &Path,
    sparsity: usize,
    records: I,
) -> Result<Vec<IndexSample>, SegmentError>
where
    I: Iterator<Item = (&'a str, &'a str)>,
{
    let tmp_path = path.with_extension("tmp");
    let mut samples = Vec::new();

    {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut w = BufWriter::new(file);

        let mut offset: u64 = 0;
        let mut position: usize = 0;
        for (key, value) in records {
            position += 1;
            if sparsity > 0 && position % sparsity == 0 {
                samples.push(IndexSample {
                    key: key.to_string(),
                    offset,
                });
            }
            let line = record_line(key, value)?;
            w.write_all(line.as_bytes())?;
            offset += line.len() as u64;
        }
        w.flush()?;
        w.get_ref().sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    fsync_parent(path)?;

    Ok(samples)
}

/// Rewrites `path` in place, dropping every record whose key is in `keys`.
///
/// Returns `true` if the resulting segment is empty (the caller then deletes
/// the file and removes its id from the segment list, rather than leaving an
/// empty segment on disk).
pub fn delete_keys(path: &Path, keys: &HashSet<String>) -> Result<bool, SegmentError> {
    let lines = read_lines(path)?;
    let tmp_path = path.with_extension("tmp");
    let mut remaining = 0usize;

    {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut w = BufWriter::new(file);
        for line in &lines {
            let (key, _value) = crate::format::split_record(line)?;
            if keys.contains(&key) {
                continue;
            }
            remaining += 1;
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
        }
        w.flush()?;
        w.get_ref().sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    fsync_parent(path)?;

    Ok(remaining == 0)
}

/// Fsyncs the parent directory of `path` so the rename itself is durable.
pub(crate) fn fsync_parent(path: &Path) -> Result<(), SegmentError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }
    Ok(())
}
