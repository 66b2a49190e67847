use std::path::PathBuf;

use tempfile::TempDir;

use crate::Engine;

/// Bundles a temp directory with the engine rooted in it. Keeping the
/// `TempDir` alive for the test's duration is what keeps the directory from
/// being deleted out from under the engine.
pub struct Harness {
    pub dir: TempDir,
    pub engine: Engine,
}

pub fn segment_dir(dir: &TempDir) -> PathBuf {
    dir.path().join("segments")
}

pub fn wal_path(dir: &TempDir) -> PathBuf {
    dir.path().join("wal.log")
}

/// Opens a fresh engine in a new temp directory.
pub fn open(prefix: &str, threshold: usize, sparsity_factor: usize) -> Harness {
    let dir = TempDir::new().expect("tempdir");
    let engine = Engine::new(
        segment_dir(&dir),
        wal_path(&dir),
        prefix,
        threshold,
        sparsity_factor,
    )
    .expect("open engine");
    Harness { dir, engine }
}

impl Harness {
    /// Drops the current engine (simulating a crash or clean shutdown
    /// without an explicit flush) and re-opens one against the same
    /// on-disk paths.
    pub fn reopen(self, prefix: &str, threshold: usize, sparsity_factor: usize) -> Harness {
        let Harness { dir, engine } = self;
        drop(engine);
        let engine = Engine::new(
            segment_dir(&dir),
            wal_path(&dir),
            prefix,
            threshold,
            sparsity_factor,
        )
        .expect("reopen engine");
        Harness { dir, engine }
    }
}
