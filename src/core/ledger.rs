//! Ledger facade
//!
//! [`Ledger`] exposes the public operations callers use: adding transactions
//! and products, point lookups, and computing a subject's score. It
//! coordinates the repository, the history reconstructor and the score
//! engine; a score request is one synchronous chain through them.
//!
//! Point lookups that find nothing are reported as `NotFound` here; the
//! layers below return `Option`.

use crate::core::history::{HistoryReconstructor, MalformedPolicy, DEFAULT_MAX_SLOTS};
use crate::core::repository::LedgerRepository;
use crate::core::score_engine;
use crate::core::traits::RecordStore;
use crate::types::{LedgerError, Product, ScoreResult, SlotIndex, Transaction};

/// Configuration for history reconstruction and scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreConfig {
    /// Number of slots scanned when reconstructing or appending
    pub max_slots: usize,
    /// Handling of undecodable history records
    pub on_malformed: MalformedPolicy,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            max_slots: DEFAULT_MAX_SLOTS,
            on_malformed: MalformedPolicy::Abort,
        }
    }
}

impl ScoreConfig {
    /// Create a new ScoreConfig with custom values
    ///
    /// A `max_slots` of zero falls back to the default window.
    pub fn new(max_slots: usize, on_malformed: MalformedPolicy) -> Self {
        let max_slots = if max_slots == 0 {
            tracing::warn!(
                max_slots,
                default = DEFAULT_MAX_SLOTS,
                "invalid max_slots, using default"
            );
            DEFAULT_MAX_SLOTS
        } else {
            max_slots
        };

        Self {
            max_slots,
            on_malformed,
        }
    }
}

/// Public ledger operations over a record store
#[derive(Debug)]
pub struct Ledger<S: RecordStore> {
    repository: LedgerRepository<S>,
    config: ScoreConfig,
}

impl<S: RecordStore> Ledger<S> {
    /// Create a ledger with the default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, ScoreConfig::default())
    }

    /// Create a ledger with a custom configuration
    pub fn with_config(store: S, config: ScoreConfig) -> Self {
        Self {
            repository: LedgerRepository::new(store),
            config,
        }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        self.repository.store()
    }

    /// Mutably borrow the underlying store, e.g. to flush it
    pub fn store_mut(&mut self) -> &mut S {
        self.repository.store_mut()
    }

    /// Consume the ledger, returning the store
    pub fn into_store(self) -> S {
        self.repository.into_store()
    }

    /// Write the genesis marker
    pub fn init(&mut self, value: &[u8]) -> Result<(), LedgerError> {
        self.repository.init(value.to_vec())
    }

    /// Write raw bytes under `key`
    pub fn write(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.repository.write(key, value.to_vec())
    }

    /// Read raw bytes stored under `key`
    pub fn read(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        self.repository
            .read(key)?
            .ok_or_else(|| LedgerError::not_found(format!("key '{}'", key)))
    }

    /// Ledger keys starting with `prefix`
    pub fn keys(&self, prefix: &str) -> Result<Vec<String>, LedgerError> {
        self.repository.keys(prefix)
    }

    /// Append `tx` to its subject's history
    ///
    /// # Returns
    ///
    /// The slot the transaction was stored in
    #[tracing::instrument(level = "info", skip(self, tx), fields(subject = %tx.pan_number, transaction_id = %tx.transaction_id))]
    pub fn add_transaction(&mut self, tx: &Transaction) -> Result<SlotIndex, LedgerError> {
        let slot = self
            .repository
            .append_transaction(tx, self.config.max_slots)?;
        tracing::info!(slot, "transaction added");
        Ok(slot)
    }

    /// Store `tx` under its id-addressed key only
    pub fn index_transaction(&mut self, tx: &Transaction) -> Result<(), LedgerError> {
        self.repository.put_transaction_by_id(tx)
    }

    /// Store `product` under its product id
    #[tracing::instrument(level = "info", skip(self, product), fields(product_id = %product.product_id))]
    pub fn add_product(&mut self, product: &Product) -> Result<(), LedgerError> {
        self.repository.put_product(product)?;
        tracing::info!("product added");
        Ok(())
    }

    /// Transaction stored in history slot `slot` of `subject`
    pub fn get_transaction(
        &self,
        subject: &str,
        slot: SlotIndex,
    ) -> Result<Transaction, LedgerError> {
        self.repository
            .get_transaction(subject, slot)?
            .ok_or_else(|| {
                LedgerError::not_found(format!(
                    "transaction slot {} for subject '{}'",
                    slot, subject
                ))
            })
    }

    /// Id-addressed transaction `transaction_id` of `subject`
    pub fn get_transaction_by_id(
        &self,
        subject: &str,
        transaction_id: &str,
    ) -> Result<Transaction, LedgerError> {
        self.repository
            .get_transaction_by_id(subject, transaction_id)?
            .ok_or_else(|| {
                LedgerError::not_found(format!(
                    "transaction '{}' for subject '{}'",
                    transaction_id, subject
                ))
            })
    }

    /// Product stored under `product_id`
    pub fn get_product(&self, product_id: &str) -> Result<Product, LedgerError> {
        self.repository
            .get_product(product_id)?
            .ok_or_else(|| LedgerError::not_found(format!("product '{}'", product_id)))
    }

    /// Ordered transaction history of `subject`
    pub fn history(&self, subject: &str) -> Result<Vec<Transaction>, LedgerError> {
        HistoryReconstructor::new(&self.repository)
            .with_policy(self.config.on_malformed)
            .reconstruct(subject, self.config.max_slots)
    }

    /// Compute the credit score of `subject`
    ///
    /// Read-only: repeated calls over the same stored history return the same
    /// result.
    ///
    /// # Errors
    ///
    /// * `NoHistory` if slot 0 is empty
    /// * `UndefinedScore` if the loan amount is zero
    /// * `MalformedRecord` if a history record cannot be decoded (under the
    ///   abort policy)
    /// * `StoreUnavailable` on store failure
    #[tracing::instrument(level = "info", skip(self))]
    pub fn compute_score(&self, subject: &str) -> Result<ScoreResult, LedgerError> {
        let history = self.history(subject)?;
        let result = score_engine::score(&history)?;

        tracing::info!(
            records = history.len(),
            sum_emi = result.aggregate.sum_emi,
            sum_outstanding = result.aggregate.sum_outstanding,
            loan_amount = result.aggregate.loan_amount,
            score = result.score,
            "score computed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MemoryRecordStore, RecordStore, SharedRecordStore};
    use crate::io::codec::encode;
    use crate::types::ErrorKind;
    use rstest::rstest;
    use std::cell::Cell;
    use std::thread;

    fn tx(subject: &str, kind: &str, id: &str, amount: f64) -> Transaction {
        Transaction {
            pan_number: subject.to_string(),
            transaction_type: kind.to_string(),
            loan_id: "L1".to_string(),
            transaction_id: id.to_string(),
            amount,
            transaction_date: "2017-01-01".to_string(),
            institution_name: "Bank".to_string(),
        }
    }

    fn seeded_ledger(loan: f64) -> Ledger<MemoryRecordStore> {
        let mut ledger = Ledger::new(MemoryRecordStore::new());
        ledger.add_transaction(&tx("PAN1", "LOAN", "T1", loan)).unwrap();
        ledger.add_transaction(&tx("PAN1", "EMI", "T2", 12000.0)).unwrap();
        ledger
            .add_transaction(&tx("PAN1", "OUTSTANDING", "T3", 4000.0))
            .unwrap();
        ledger
    }

    #[test]
    fn test_compute_score_reference_history() {
        let ledger = seeded_ledger(100000.0);
        assert_eq!(ledger.compute_score("PAN1").unwrap().score, 624.0);
    }

    #[test]
    fn test_compute_score_is_deterministic() {
        let ledger = seeded_ledger(100000.0);
        let first = ledger.compute_score("PAN1").unwrap();
        let second = ledger.compute_score("PAN1").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_score_zero_loan() {
        let ledger = seeded_ledger(0.0);
        let err = ledger.compute_score("PAN1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedScore);
    }

    #[test]
    fn test_compute_score_unknown_subject() {
        let ledger = seeded_ledger(100000.0);
        assert_eq!(
            ledger.compute_score("PAN9").unwrap_err(),
            LedgerError::NoHistory
        );
    }

    #[test]
    fn test_compute_score_ignores_records_after_hole() {
        let mut ledger = Ledger::new(MemoryRecordStore::new());
        ledger
            .add_transaction(&tx("PAN1", "LOAN", "T1", 100000.0))
            .unwrap();
        // slot 1 left empty, slot 2 populated
        let late = encode(&tx("PAN1", "EMI", "T2", 90000.0)).unwrap();
        ledger.write("PAN12", &late).unwrap();

        let result = ledger.compute_score("PAN1").unwrap();
        assert_eq!(result.aggregate.total_count(), 1);
        assert_eq!(result.score, 600.0);
    }

    #[test]
    fn test_point_lookups_report_not_found() {
        let ledger = seeded_ledger(100000.0);

        assert_eq!(
            ledger.get_transaction("PAN1", 1).unwrap().transaction_type,
            "EMI"
        );
        for err in [
            ledger.get_transaction("PAN1", 7).unwrap_err(),
            ledger.get_transaction_by_id("PAN1", "T1").unwrap_err(),
            ledger.get_product("P1").unwrap_err(),
            ledger.read("nothing").unwrap_err(),
        ] {
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[test]
    fn test_index_transaction_enables_id_lookup() {
        let mut ledger = Ledger::new(MemoryRecordStore::new());
        let stored = tx("PAN1", "EMI", "TX7", 10.0);
        ledger.index_transaction(&stored).unwrap();

        assert_eq!(ledger.get_transaction_by_id("PAN1", "TX7").unwrap(), stored);
        assert!(ledger.history("PAN1").unwrap().is_empty());
    }

    #[test]
    fn test_skip_policy_scores_around_malformed_slot() {
        let config = ScoreConfig::new(100, MalformedPolicy::Skip);
        let mut ledger = Ledger::with_config(MemoryRecordStore::new(), config);
        ledger
            .add_transaction(&tx("PAN1", "LOAN", "T1", 100000.0))
            .unwrap();
        ledger.write("PAN11", b"corrupt").unwrap();
        ledger
            .add_transaction(&tx("PAN1", "EMI", "T3", 12000.0))
            .unwrap();

        let result = ledger.compute_score("PAN1").unwrap();
        assert_eq!(result.aggregate.total_count(), 2);
        assert_eq!(result.score, 636.0);
    }

    #[test]
    fn test_colliding_subject_records_are_not_scored() {
        let mut ledger = Ledger::new(MemoryRecordStore::new());
        ledger.add_transaction(&tx("PAN11", "LOAN", "L0", 1000.0)).unwrap();
        ledger.add_transaction(&tx("PAN11", "EMI", "E1", 900.0)).unwrap();
        for i in 0..10 {
            let slot = ledger
                .add_transaction(&tx("PAN1", "OTHER", &format!("X{}", i), 1.0))
                .unwrap();
            assert_eq!(slot, i);
        }

        let err = ledger.compute_score("PAN1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedScore);
        assert_eq!(ledger.history("PAN1").unwrap().len(), 10);
        assert_eq!(ledger.compute_score("PAN11").unwrap().score, 870.0);
    }

    /// Store that starts failing reads after a number of successful ones
    struct FlakyStore {
        inner: MemoryRecordStore,
        reads_left: Cell<usize>,
    }

    impl RecordStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
            match self.reads_left.get() {
                0 => Err(LedgerError::store_unavailable("connection reset")),
                n => {
                    self.reads_left.set(n - 1);
                    self.inner.get(key)
                }
            }
        }

        fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
            self.inner.put(key, value)
        }

        fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
            self.inner.scan_prefix(prefix)
        }
    }

    #[rstest]
    #[case::first_read(0)]
    #[case::mid_history(2)]
    #[case::terminating_read(3)]
    fn test_store_failure_fails_score(#[case] successful_reads: usize) {
        let store = seeded_ledger(100000.0).into_store();
        let ledger = Ledger::new(FlakyStore {
            inner: store,
            reads_left: Cell::new(successful_reads),
        });

        let err = ledger.compute_score("PAN1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }

    #[test]
    fn test_zero_max_slots_falls_back_to_default() {
        let config = ScoreConfig::new(0, MalformedPolicy::Abort);
        assert_eq!(config.max_slots, DEFAULT_MAX_SLOTS);
    }

    #[test]
    fn test_concurrent_scoring_over_shared_store() {
        let store = SharedRecordStore::new();
        {
            let mut ledger = Ledger::new(&store);
            ledger
                .add_transaction(&tx("PAN1", "LOAN", "T1", 100000.0))
                .unwrap();
            ledger
                .add_transaction(&tx("PAN1", "EMI", "T2", 12000.0))
                .unwrap();
            ledger
                .add_transaction(&tx("PAN1", "OUTSTANDING", "T3", 4000.0))
                .unwrap();
        }

        let scores: Vec<f64> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let store = &store;
                    scope.spawn(move || Ledger::new(store).compute_score("PAN1").unwrap().score)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(scores, vec![624.0; 4]);
    }
}
