//! Configuration for binspill
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SpillError};

/// Configuration for one [`SpillStore`](crate::SpillStore) instance
///
/// The scratch directory is exclusively owned by the store for its lifetime.
/// Concurrent store instances must be given distinct scratch directories.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for transient page files. Created on open; any pre-existing
    /// files in it are cleared (leftovers from a crashed prior run).
    pub scratch_dir: PathBuf,

    /// Number of consecutive bin indices covered by one page file
    /// (`page_id = key / page_capacity`).
    pub page_capacity: i64,

    /// Buffer size for sequential page file reads and writes (in bytes).
    pub io_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join("binspill-scratch"),
            page_capacity: 10_000,
            io_buffer_size: 1024 * 1024, // 1 MiB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.page_capacity <= 0 {
            return Err(SpillError::Config(format!(
                "page_capacity must be positive, got {}",
                self.page_capacity
            )));
        }
        if self.io_buffer_size == 0 {
            return Err(SpillError::Config(
                "io_buffer_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the scratch directory for page files
    pub fn scratch_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.scratch_dir = path.into();
        self
    }

    /// Set the number of bin indices per page file
    pub fn page_capacity(mut self, capacity: i64) -> Self {
        self.config.page_capacity = capacity;
        self
    }

    /// Set the I/O buffer size (in bytes)
    pub fn io_buffer_size(mut self, size: usize) -> Self {
        self.config.io_buffer_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
