//! Errors surfaced by the engine.
//!
//! Leaf crates (`wal`, `segment`) carry their own `thiserror` enums;
//! `EngineError` wraps them so callers at the orchestration layer have one
//! error type to match on.

use thiserror::Error;

/// Errors that can occur while operating the storage engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An underlying I/O error (segment or metadata file operations).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A write-ahead log operation failed.
    #[error("wal error: {0}")]
    Wal(#[from] wal::WalError),

    /// A segment file operation failed.
    #[error("segment error: {0}")]
    Segment(#[from] segment::SegmentError),

    /// The metadata snapshot or a segment could not be parsed.
    #[error("corrupt: {0}")]
    Corrupt(String),
}
