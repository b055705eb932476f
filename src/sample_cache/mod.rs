//! # Sample cache
//!
//! Persisted sample batches live in a single directory (`data/` by default), one NPY
//! file per [`SampleKey`]. A batch is written once and then reused by every later
//! request with the same key.
//!
//! ## Guarantees
//!
//! * Files are written to a temporary file in the cache directory and renamed into
//!   place, so a reader never sees a partially written batch.
//! * A stored batch reads back bit-identical.
//! * A file that exists but cannot be decoded, or whose shape does not match its key,
//!   is reported as [`GalmockError::CacheCorruption`] and never silently regenerated.
//! * The cache directory is created on the first write.
//!
//! Concurrent writers producing the same key both generate their batch; the last rename
//! wins and readers always observe one complete file.
pub mod key;
pub mod npy;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::galmock_errors::GalmockError;
use crate::phase_space::{SampleBatch, SAMPLE_COLUMNS};

pub use key::SampleKey;

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCache {
    dir: Utf8PathBuf,
}

impl Default for SampleCache {
    fn default() -> Self {
        SampleCache::new(DEFAULT_CACHE_DIR)
    }
}

impl SampleCache {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        SampleCache { dir: dir.into() }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Location of the batch identified by `key`.
    pub fn path_for(&self, key: &SampleKey) -> Utf8PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn contains(&self, key: &SampleKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Load the batch identified by `key`.
    ///
    /// Return
    /// ----------
    /// * `Ok(None)` if no file exists for the key.
    /// * `Ok(Some(batch))` with exactly `key.n` rows.
    /// * `Err(GalmockError::CacheCorruption)` if the file is unreadable, malformed, or
    ///   holds a shape other than `key.n × 6`.
    pub fn load(&self, key: &SampleKey) -> Result<Option<SampleBatch>, GalmockError> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!(%path, "sample cache miss");
            return Ok(None);
        }

        let corruption = |reason: String| GalmockError::CacheCorruption {
            path: path.to_string(),
            reason,
        };

        let file = File::open(&path).map_err(|e| corruption(e.to_string()))?;
        let mut reader = BufReader::new(file);
        let shape = npy::read_header(&mut reader).map_err(|e| corruption(e.to_string()))?;

        // checked before the payload is read, so a bogus header never drives an allocation
        let expected = [key.n, SAMPLE_COLUMNS];
        if shape != expected {
            return Err(corruption(format!(
                "shape {shape:?} does not match expected {expected:?}"
            )));
        }
        let values =
            npy::read_values(&mut reader, &shape).map_err(|e| corruption(e.to_string()))?;
        let batch =
            SampleBatch::from_row_major(key.n, &values).map_err(|e| corruption(e.to_string()))?;

        debug!(%path, rows = batch.len(), "sample cache hit");
        Ok(Some(batch))
    }

    /// Persist `batch` under `key`, atomically replacing any previous file.
    ///
    /// Return
    /// ----------
    /// * The path of the written file.
    /// * `Err(GalmockError::DimensionMismatch)` if the batch does not have `key.n` rows.
    /// * `Err(GalmockError::IoError)` if the directory or the file cannot be written.
    pub fn store(&self, key: &SampleKey, batch: &SampleBatch) -> Result<Utf8PathBuf, GalmockError> {
        if batch.len() != key.n {
            return Err(GalmockError::DimensionMismatch {
                expected: key.n,
                found: batch.len(),
            });
        }
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            npy::write_npy(&mut writer, batch.len(), SAMPLE_COLUMNS, &batch.to_row_major())?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&path)?;

        debug!(%path, rows = batch.len(), "sample batch stored");
        Ok(path)
    }
}
