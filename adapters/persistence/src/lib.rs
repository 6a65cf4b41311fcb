#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-score persistence for Tile Merge adapters.
//!
//! The session reads the stored value once at startup and writes it back
//! whenever the world raises its best score. Only a single integer is kept,
//! stored under the `bestScore` key.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Key under which the best score is stored.
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Storage backend for the all-time best score.
pub trait BestScoreStore {
    /// Reads the stored best score, returning zero when nothing was saved yet.
    fn load(&self) -> Result<u64, StoreError>;

    /// Replaces the stored best score.
    fn save(&mut self, best_score: u64) -> Result<(), StoreError>;
}

/// Errors raised while reading or writing the best score.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("failed to access best score file {}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The backing file did not contain a valid record.
    #[error("failed to decode best score file {}", path.display())]
    Decode {
        /// File that was being decoded.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// The record could not be encoded.
    #[error("failed to encode best score {best_score}")]
    Encode {
        /// Value that failed to encode.
        best_score: u64,
        /// Underlying serialization failure.
        #[source]
        source: toml::ser::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    #[serde(rename = "bestScore")]
    best_score: u64,
}

/// Store that keeps the best score in memory for the lifetime of the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    best_score: u64,
}

impl MemoryStore {
    /// Creates a store preloaded with the provided best score.
    #[must_use]
    pub const fn new(best_score: u64) -> Self {
        Self { best_score }
    }

    /// Value most recently saved.
    #[must_use]
    pub const fn best_score(&self) -> u64 {
        self.best_score
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.best_score)
    }

    fn save(&mut self, best_score: u64) -> Result<(), StoreError> {
        self.best_score = best_score;
        Ok(())
    }
}

/// Store backed by a small TOML file.
///
/// A missing file reads as zero; the file and its parent directories are
/// created on the first save. Saves go through a temporary file in the same
/// directory that is renamed over the record, so a reader sees either the
/// old or the new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store reading and writing the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BestScoreStore for FileStore {
    fn load(&self) -> Result<u64, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no best score stored yet");
                return Ok(0);
            }
            Err(error) => return Err(self.io_error(error)),
        };

        let record: BestScoreRecord =
            toml::from_str(&contents).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;
        debug!(best_score = record.best_score, "best score loaded");
        Ok(record.best_score)
    }

    fn save(&mut self, best_score: u64) -> Result<(), StoreError> {
        let encoded = toml::to_string(&BestScoreRecord { best_score })
            .map_err(|source| StoreError::Encode { best_score, source })?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;

        let mut staged = NamedTempFile::new_in(parent).map_err(|error| self.io_error(error))?;
        staged
            .write_all(encoded.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|error| self.io_error(error))?;
        let _ = staged
            .persist(&self.path)
            .map_err(|error| self.io_error(error.error))?;
        debug!(best_score, path = %self.path.display(), "best score saved");
        Ok(())
    }
}
