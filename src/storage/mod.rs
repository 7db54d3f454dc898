//! Local filesystem persistence.
//!
//! JSONL files are the source of truth: one file per entity type under the
//! data directory, one JSON object per line. Derived reports written by the
//! CLI land under `derived/`.

use std::path::PathBuf;
use thiserror::Error;

mod jsonl;

pub use jsonl::{EntityType, JsonlReader, JsonlWriter};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Directory holding the JSONL record files.
    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }

    /// Directory for derived report output.
    pub fn derived_dir(&self) -> PathBuf {
        self.data_dir.join("derived")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
