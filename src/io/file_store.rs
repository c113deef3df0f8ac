//! File-backed record store
//!
//! Persists the ledger as a two-column CSV file (`key,value`) so the CLI can
//! keep state between invocations.
//!
//! # Design
//!
//! The whole file is loaded into a [`MemoryRecordStore`] on open. Writes go to
//! the in-memory copy and mark the store dirty; [`FileRecordStore::flush`]
//! rewrites the file through a temporary file in the same directory that is
//! renamed over the ledger, so a crash mid-write never leaves a truncated
//! ledger behind. A failed flush removes its temporary file.
//!
//! Values are written as raw bytes; the CSV writer quotes the commas, quotes
//! and newlines that JSON records contain.

use crate::core::{MemoryRecordStore, RecordStore};
use crate::types::LedgerError;
use csv::{ReaderBuilder, WriterBuilder};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const HEADER: [&str; 2] = ["key", "value"];

/// Record store persisted to a CSV ledger file
#[derive(Debug)]
pub struct FileRecordStore {
    path: PathBuf,
    records: MemoryRecordStore,
    dirty: bool,
}

impl FileRecordStore {
    /// Open the ledger file at `path`
    ///
    /// A missing file is an empty ledger; it is created on the first
    /// [`flush`](Self::flush) after a write.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the file exists but cannot be read or is
    /// not a valid ledger file (missing `key,value` header, wrong column
    /// count, non-UTF-8 key).
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let records = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!(path = %path.display(), "ledger file not found, starting empty");
            MemoryRecordStore::new()
        };

        tracing::debug!(path = %path.display(), keys = records.len(), "opened ledger file");

        Ok(Self {
            path: path.to_path_buf(),
            records,
            dirty: false,
        })
    }

    fn load(path: &Path) -> Result<MemoryRecordStore, LedgerError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| {
                LedgerError::store_unavailable(format!(
                    "failed to open ledger file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        let headers = reader.byte_headers()?;
        if !headers.is_empty() && !headers.iter().eq(HEADER.iter().map(|h| h.as_bytes())) {
            return Err(LedgerError::store_unavailable(format!(
                "ledger file '{}' does not start with a '{}' header",
                path.display(),
                HEADER.join(",")
            )));
        }

        let mut entries = Vec::new();
        for row in reader.byte_records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let (key, value) = match (row.get(0), row.get(1)) {
                (Some(key), Some(value)) if row.len() == 2 => (key, value),
                _ => {
                    return Err(LedgerError::store_unavailable(format!(
                        "ledger file line {}: expected 2 columns, found {}",
                        line,
                        row.len()
                    )))
                }
            };
            let key = String::from_utf8(key.to_vec()).map_err(|_| {
                LedgerError::store_unavailable(format!(
                    "ledger file line {}: key is not valid UTF-8",
                    line
                ))
            })?;
            entries.push((key, value.to_vec()));
        }

        Ok(entries.into_iter().collect())
    }

    /// Whether there are writes not yet flushed to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write all records back to the ledger file
    ///
    /// Does nothing if no write happened since the last flush.
    pub fn flush(&mut self) -> Result<(), LedgerError> {
        if !self.dirty {
            return Ok(());
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // dropped (and deleted) on any early return below
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = WriterBuilder::new().from_writer(tmp.as_file_mut());
            writer.write_record(HEADER)?;
            for (key, value) in self.records.iter() {
                writer.write_record([key.as_bytes(), value.as_slice()])?;
            }
            writer.flush()?;
        }

        tmp.persist(&self.path).map_err(|e| {
            LedgerError::store_unavailable(format!(
                "failed to replace ledger file '{}': {}",
                self.path.display(),
                e.error
            ))
        })?;
        self.dirty = false;

        tracing::debug!(
            path = %self.path.display(),
            keys = self.records.len(),
            "flushed ledger file"
        );
        Ok(())
    }
}

impl RecordStore for FileRecordStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.records.get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.records.put(key, value)?;
        self.dirty = true;
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        self.records.scan_prefix(prefix)
    }

    fn contains(&self, key: &str) -> Result<bool, LedgerError> {
        self.records.contains(key)
    }
}
