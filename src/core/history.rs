//! History reconstruction
//!
//! Rebuilds a subject's ordered transaction history from individually keyed
//! ledger entries. The store has no iteration cursor, so reconstruction is a
//! synchronous scan over slots `0, 1, 2, ...` that stops at the first empty
//! slot or at the scan window, whichever comes first. A populated slot after
//! a hole is never reached. Slots holding another subject's record are
//! passed over without ending the scan.

use crate::core::repository::{slot_window, LedgerRepository, SlotEntry};
use crate::core::traits::RecordStore;
use crate::types::{ErrorKind, LedgerError, Transaction};
use clap::ValueEnum;

/// Default number of slots scanned per subject
pub const DEFAULT_MAX_SLOTS: usize = 100;

/// What reconstruction does with a slot that cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MalformedPolicy {
    /// Fail the whole reconstruction with `MalformedRecord`
    #[default]
    Abort,

    /// Log and skip the slot; it still counts as occupied, not as a hole
    Skip,
}

/// Scans a subject's slot sequence through a repository
pub struct HistoryReconstructor<'a, S: RecordStore> {
    repository: &'a LedgerRepository<S>,
    policy: MalformedPolicy,
}

impl<'a, S: RecordStore> HistoryReconstructor<'a, S> {
    /// Create a reconstructor that aborts on malformed records
    pub fn new(repository: &'a LedgerRepository<S>) -> Self {
        Self {
            repository,
            policy: MalformedPolicy::default(),
        }
    }

    /// Set the malformed-record policy
    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reconstruct the ordered history of `subject`
    ///
    /// # Arguments
    ///
    /// * `subject` - Subject identifier
    /// * `max_slots` - Upper bound on the number of slots scanned
    ///
    /// # Returns
    ///
    /// The decoded transactions in slot order. Empty if slot 0 is empty.
    ///
    /// # Errors
    ///
    /// * `MalformedRecord` under [`MalformedPolicy::Abort`]; no partial
    ///   history is returned
    /// * `StoreUnavailable` on any store failure
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn reconstruct(
        &self,
        subject: &str,
        max_slots: usize,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let mut history = Vec::new();

        for slot in slot_window(max_slots) {
            match self.repository.slot(subject, slot) {
                Ok(SlotEntry::Record(tx)) => history.push(tx),
                Ok(SlotEntry::Empty) => {
                    tracing::debug!(slot, "first empty slot ends history");
                    break;
                }
                Ok(SlotEntry::Foreign { key, owner }) => {
                    tracing::debug!(slot, %key, %owner, "passing over slot of another subject");
                }
                Err(e) if e.kind() == ErrorKind::MalformedRecord => match self.policy {
                    MalformedPolicy::Abort => return Err(e),
                    MalformedPolicy::Skip => {
                        tracing::warn!(slot, error = %e, "skipping malformed history record");
                    }
                },
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(records = history.len(), "history reconstructed");
        Ok(history)
    }
}
