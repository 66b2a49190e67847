//! # Segment
//!
//! The on-disk, immutable sorted file produced by a memtable flush, plus the
//! operations the engine needs against it: writing a new one, reading a
//! value out of one (by offset or by full scan), rewriting one to drop
//! shadowed keys, and pairwise-merging two adjacent segments during
//! compaction.
//!
//! ## File format
//!
//! Plain UTF-8 text. One record per line: `key,value\n`. Keys are unique and
//! strictly ascending within a segment. Neither key nor value may contain a
//! comma or a newline — the same format the write-ahead log uses, so a
//! segment and a replayed WAL are byte-for-byte comparable for the same
//! input.

pub mod format;
pub mod merge;
pub mod reader;
pub mod writer;

use std::io;
use thiserror::Error;

/// Errors that can occur while reading or writing segment files.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A key or value violated the field constraints (empty, or containing
    /// the separator/terminator).
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// A line on disk could not be parsed as `key,value`.
    #[error("corrupt segment: {0}")]
    Corrupt(String),
}

pub use reader::{get_from_offset, linear_search, read_records};
pub use writer::{delete_keys, write_segment, IndexSample};

#[cfg(test)]
mod tests;
