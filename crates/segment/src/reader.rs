//! Reading segments: full scans, and the offset-seek-then-scan-forward path
//! used by the sparse index.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::format::split_record;
use crate::SegmentError;

/// Reads every line of `path` (without trailing newlines) into memory.
///
/// Segments are expected to stay small enough for this to be reasonable;
/// there is no streaming variant because every caller in this crate needs
/// the full, already-sorted contents anyway (shadowing rewrite, pairwise
/// merge, index repopulation).
pub fn read_lines(path: &Path) -> Result<Vec<String>, SegmentError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        out.push(line);
    }
    Ok(out)
}

/// Reads every `(key, value)` record in `path`, in file order.
pub fn read_records(path: &Path) -> Result<Vec<(String, String)>, SegmentError> {
    read_lines(path)?.iter().map(|l| split_record(l)).collect()
}

/// Seeks to `offset` in `path` and scans forward looking for `key`.
///
/// Segments are sorted ascending by key, so the scan stops as soon as a
/// record's key exceeds the target (the key cannot appear later) or at EOF.
pub fn get_from_offset(
    path: &Path,
    offset: u64,
    key: &str,
) -> Result<Option<String>, SegmentError> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let reader = BufReader::new(file);
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (k, v) = split_record(&line)?;
        if k == key {
            return Ok(Some(v));
        }
        if k.as_str() > key {
            return Ok(None);
        }
    }
    Ok(None)
}

/// Linearly scans the whole segment for `key`. Used as the fallback path
/// once the sparse index and bloom filter have been exhausted.
pub fn linear_search(path: &Path, key: &str) -> Result<Option<String>, SegmentError> {
    get_from_offset(path, 0, key)
}
