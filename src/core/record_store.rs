//! In-memory record store
//!
//! Single-threaded [`RecordStore`] backed by an ordered map. Used by tests,
//! benchmarks and as the working copy of the file-backed ledger.

use crate::core::traits::RecordStore;
use crate::types::LedgerError;
use std::collections::BTreeMap;

/// Ordered in-memory key-value store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRecordStore {
    /// Map of ledger key to raw record bytes
    records: BTreeMap<String, Vec<u8>>,
}

impl MemoryRecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.records.iter()
    }
}

impl FromIterator<(String, Vec<u8>)> for MemoryRecordStore {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u8>)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.records.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.records.insert(key.to_string(), value);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        Ok(self
            .records
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn contains(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.records.contains_key(key))
    }
}
