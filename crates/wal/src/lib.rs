//! # WAL — append-only write-ahead log
//!
//! Provides crash-safe durability for the storage engine. Every mutation is
//! written here **before** the corresponding memtable update, so that on
//! restart the log can be replayed to reconstruct the memtable exactly.
//!
//! ## Record format
//!
//! Identical to the on-disk segment format: one record per line, `key,value\n`,
//! plain UTF-8. There is no frame header and no per-record checksum — the log
//! is just a running history of every write in the order it happened.
//!
//! ## Process-wide singleton
//!
//! At most one [`AppendLog`] exists per canonicalized path inside one process.
//! Re-instantiating the engine against the same WAL path reuses the same
//! handle rather than opening the file twice. This mirrors how a singleton
//! decorator keyed by filename is used to guarantee a single writer per log
//! file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wal::AppendLog;
//!
//! let log = AppendLog::instance("wal.log").unwrap();
//! log.append("hello", "world").unwrap();
//! for (k, v) in log.replay().unwrap() {
//!     println!("{k} = {v}");
//! }
//! ```

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors that can occur during WAL operations.
#[derive(Debug, Error)]
pub enum WalError {
    /// An underlying I/O error, possibly after exhausting retries.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A line in the log could not be parsed as `key,value`.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Number of times `append` retries a transient I/O failure before giving up.
const APPEND_RETRIES: usize = 3;

/// An append-only, process-wide singleton log file.
///
/// `append` and `clear` are mutually exclusive: both take the same internal
/// mutex, so a writer arriving mid-clear simply blocks until the clear
/// finishes and the file has been reopened, rather than writing into a file
/// that is about to be truncated out from under it.
///
/// Durability boundary: `append` returns once the OS has the bytes (`flush`),
/// not once they are fsynced to the platter. This is a stated weakness, not
/// an oversight — callers needing fsync-level durability should call
/// [`AppendLog::sync`] explicitly.
pub struct AppendLog {
    path: PathBuf,
    file: Mutex<File>,
}

lazy_static! {
    static ref REGISTRY: Mutex<HashMap<PathBuf, Arc<AppendLog>>> = Mutex::new(HashMap::new());
}

impl AppendLog {
    /// Returns the process-wide singleton for `path`, creating (and opening,
    /// in append mode) the file if this is the first call for that path.
    pub fn instance<P: AsRef<Path>>(path: P) -> Result<Arc<AppendLog>, WalError> {
        let path = path.as_ref().to_path_buf();
        let mut registry = REGISTRY.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = registry.get(&path) {
            return Ok(Arc::clone(existing));
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&path)?;

        let log = Arc::new(AppendLog {
            path: path.clone(),
            file: Mutex::new(file),
        });
        registry.insert(path, Arc::clone(&log));
        Ok(log)
    }

    /// Returns the path this log was opened against.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one `key,value` record, retrying transient I/O failures a
    /// bounded number of times before surfacing an error.
    ///
    /// Neither `key` nor `value` may contain a comma or a newline; callers
    /// are expected to validate that before calling (the engine does this at
    /// its boundary so the error carries request-level context).
    pub fn append(&self, key: &str, value: &str) -> Result<(), WalError> {
        let line = format!("{key},{value}\n");
        let mut last_err = None;
        for _ in 0..APPEND_RETRIES {
            match self.append_once(line.as_bytes()) {
                Ok(()) => return Ok(()),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap())
    }

    fn append_once(&self, line: &[u8]) -> Result<(), WalError> {
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.write_all(line)?;
        file.flush()?;
        Ok(())
    }

    /// Forces buffered data to disk via `fsync`.
    pub fn sync(&self) -> Result<(), WalError> {
        let file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.sync_all()?;
        Ok(())
    }

    /// Reads every record currently in the log, in file order.
    ///
    /// A truncated final line (no trailing `\n`, e.g. a crash mid-write) is
    /// ignored rather than treated as corruption — everything written before
    /// it is still replayed.
    pub fn replay(&self) -> Result<Vec<(String, String)>, WalError> {
        // Hold the lock for the duration of the read so a concurrent clear
        // cannot interleave with replay.
        let _guard = self.file.lock().unwrap_or_else(|e| e.into_inner());
        let f = File::open(&self.path)?;
        let reader = BufReader::new(f);
        let mut out = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            match line.split_once(',') {
                Some((k, v)) => out.push((k.to_string(), v.to_string())),
                None => return Err(WalError::Corrupt(line)),
            }
        }
        Ok(out)
    }

    /// Truncates the log to empty.
    ///
    /// Mutually exclusive with `append`: holds the same mutex, so any append
    /// racing a clear either completes first (and is then wiped) or blocks
    /// until the clear finishes and writes into the fresh, empty file.
    pub fn clear(&self) -> Result<(), WalError> {
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        let fresh = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .truncate(true)
            .open(&self.path)?;
        *file = fresh;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
