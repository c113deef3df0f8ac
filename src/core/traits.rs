//! Record store abstraction
//!
//! The ledger core reads and writes through this trait only, so the same
//! repository, reconstruction and scoring logic runs against an in-memory
//! map, a concurrent map or a file-backed ledger.

use crate::types::LedgerError;

/// Key-value store the ledger persists records into
///
/// Implementations provide single-key atomicity and nothing more. A `put`
/// silently supersedes any earlier value under the same key. Failures are
/// reported as [`LedgerError::StoreUnavailable`] and are never retried by
/// callers.
pub trait RecordStore {
    /// Get the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// All entries whose key starts with `prefix`, ordered by key
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    /// Whether any value is stored under `key`
    fn contains(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.get(key)?.is_some())
    }
}
