//! Runtime configuration for the server and engine, read from environment
//! variables with sensible defaults.
//!
//! ```text
//! RIPTIDEKV_ADDRESS          bind address           (default: "127.0.0.1")
//! RIPTIDEKV_PORT             bind port              (default: 8080)
//! RIPTIDEKV_SEGMENTS_DIR     segments directory     (default: "data/segments")
//! RIPTIDEKV_WAL_PATH         write-ahead log path   (default: "data/wal.log")
//! RIPTIDEKV_THRESHOLD        flush threshold, bytes (default: 3000)
//! RIPTIDEKV_SPARSITY_FACTOR  index density factor   (default: 100)
//! ```

/// Reads a configuration value from the environment, falling back to
/// `default`.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// All runtime settings needed to start an engine and, optionally, the
/// network server in front of it.
#[derive(Debug, Clone)]
pub struct Config {
    pub address: String,
    pub port: u16,
    pub segments_dir: String,
    pub wal_path: String,
    pub threshold: usize,
    pub sparsity_factor: usize,
}

impl Config {
    /// Default memtable flush threshold in bytes.
    pub const DEFAULT_THRESHOLD: usize = 3000;
    /// Default sparse-index density factor (`sparsity = threshold / sparsity_factor`).
    pub const DEFAULT_SPARSITY_FACTOR: usize = 100;

    /// Builds a `Config` from environment variables, defaulting anything
    /// unset.
    pub fn from_env() -> Self {
        Self {
            address: env_or("RIPTIDEKV_ADDRESS", "127.0.0.1"),
            port: env_or("RIPTIDEKV_PORT", "8080").parse().unwrap_or(8080),
            segments_dir: env_or("RIPTIDEKV_SEGMENTS_DIR", "data/segments"),
            wal_path: env_or("RIPTIDEKV_WAL_PATH", "data/wal.log"),
            threshold: env_or(
                "RIPTIDEKV_THRESHOLD",
                &Self::DEFAULT_THRESHOLD.to_string(),
            )
            .parse()
            .unwrap_or(Self::DEFAULT_THRESHOLD),
            sparsity_factor: env_or(
                "RIPTIDEKV_SPARSITY_FACTOR",
                &Self::DEFAULT_SPARSITY_FACTOR.to_string(),
            )
            .parse()
            .unwrap_or(Self::DEFAULT_SPARSITY_FACTOR),
        }
    }

    /// The byte interval between sparse-index samples: `threshold /
    /// sparsity_factor`.
    #[must_use]
    pub fn sparsity(&self) -> usize {
        self.threshold / self.sparsity_factor.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            segments_dir: "data/segments".to_string(),
            wal_path: "data/wal.log".to_string(),
            threshold: Self::DEFAULT_THRESHOLD,
            sparsity_factor: Self::DEFAULT_SPARSITY_FACTOR,
        }
    }
}
