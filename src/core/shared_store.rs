//! Thread-safe record store
//!
//! This module provides [`SharedRecordStore`], a [`RecordStore`] backed by
//! `DashMap` so that one store can serve concurrent scoring requests.
//!
//! # Thread Safety
//!
//! Reads never block each other and writes to different keys proceed in
//! parallel. Writes to the same key are serialized by the map's sharding
//! locks; the last writer wins. `RecordStore` is implemented for
//! `&SharedRecordStore` so each request can wrap a shared reference in its own
//! [`Ledger`](crate::core::Ledger).

use crate::core::traits::RecordStore;
use crate::types::LedgerError;
use dashmap::DashMap;

/// Concurrent in-memory key-value store
#[derive(Debug, Default)]
pub struct SharedRecordStore {
    /// Concurrent map of ledger key to raw record bytes
    records: DashMap<String, Vec<u8>>,
}

impl SharedRecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Store a value through a shared reference
    pub fn insert(&self, key: &str, value: Vec<u8>) {
        self.records.insert(key.to_string(), value);
    }

    /// Get a value through a shared reference
    ///
    /// The value is cloned so the shard lock is released immediately.
    pub fn lookup(&self, key: &str) -> Option<Vec<u8>> {
        self.records.get(key).map(|entry| entry.value().clone())
    }

    fn entries_with_prefix(&self, prefix: &str) -> Vec<(String, Vec<u8>)> {
        let mut entries: Vec<(String, Vec<u8>)> = self
            .records
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        // DashMap iteration order is arbitrary
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl RecordStore for SharedRecordStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.lookup(key))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.insert(key, value);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        Ok(self.entries_with_prefix(prefix))
    }

    fn contains(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.records.contains_key(key))
    }
}

impl RecordStore for &SharedRecordStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.lookup(key))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.insert(key, value);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        Ok(self.entries_with_prefix(prefix))
    }

    fn contains(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.records.contains_key(key))
    }
}
