//! Ledger repository
//!
//! This module provides [`LedgerRepository`], the only component that knows
//! how ledger keys are built. Everything above it speaks in subjects, slots,
//! transaction ids and product ids.
//!
//! # Key Scheme
//!
//! | Record                         | Key                          |
//! |--------------------------------|------------------------------|
//! | transaction in a history slot  | `subject ++ slot` (decimal)  |
//! | id-addressed transaction       | `subject ++ transaction_id`  |
//! | product                        | `productid`                  |
//! | genesis marker                 | `Genesis`                    |
//!
//! Keys are plain concatenations without a separator, matching the layout of
//! existing ledger data. `"PAN1" ++ 10` and `"PAN11" ++ 0` are the same key.
//! Every slot record carries its own `PanNumber`, so a slot read as `PAN1`
//! that holds a `PAN11` record is reported as [`SlotEntry::Foreign`]: it is
//! not part of `PAN1`'s history, but it is occupied and never overwritten.
//!
//! Each put is a single key overwrite. There is no read-modify-write
//! atomicity; one writer per subject is assumed.

use crate::core::traits::RecordStore;
use crate::io::codec::{decode, encode};
use crate::types::{LedgerError, Product, SlotIndex, Transaction};

/// Key written by [`LedgerRepository::init`]
pub const GENESIS_KEY: &str = "Genesis";

/// Contents of one history slot as seen by a given subject
#[derive(Debug, Clone, PartialEq)]
pub enum SlotEntry {
    /// Nothing stored under the slot key
    Empty,
    /// A record of the requested subject
    Record(Transaction),
    /// A record of another subject whose slot key collides with this one
    Foreign {
        /// The colliding key
        key: String,
        /// Subject the stored record belongs to
        owner: String,
    },
}

/// Maps domain records onto record store keys
#[derive(Debug)]
pub struct LedgerRepository<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> LedgerRepository<S> {
    /// Create a repository over `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the repository, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    fn slot_key(subject: &str, slot: SlotIndex) -> String {
        format!("{}{}", subject, slot)
    }

    fn id_key(subject: &str, transaction_id: &str) -> String {
        format!("{}{}", subject, transaction_id)
    }

    /// Store `tx` in history slot `slot` of `subject`
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` if `tx.pan_number` is not `subject` or the record
    ///   is invalid
    /// * `StoreUnavailable` if the store write fails
    pub fn put_transaction(
        &mut self,
        subject: &str,
        slot: SlotIndex,
        tx: &Transaction,
    ) -> Result<(), LedgerError> {
        if tx.pan_number != subject {
            return Err(LedgerError::invalid_argument(
                "put_transaction",
                format!(
                    "transaction belongs to subject '{}', not '{}'",
                    tx.pan_number, subject
                ),
            ));
        }
        let bytes = encode(tx)?;
        let key = Self::slot_key(subject, slot);
        self.store.put(&key, bytes)?;
        tracing::debug!(%key, slot, transaction_id = %tx.transaction_id, "stored transaction slot");
        Ok(())
    }

    /// Store `tx` under its id-addressed key for point lookups
    pub fn put_transaction_by_id(&mut self, tx: &Transaction) -> Result<(), LedgerError> {
        let bytes = encode(tx)?;
        let key = Self::id_key(&tx.pan_number, &tx.transaction_id);
        self.store.put(&key, bytes)?;
        tracing::debug!(%key, "stored id-addressed transaction");
        Ok(())
    }

    /// Store `product` under its product id
    pub fn put_product(&mut self, product: &Product) -> Result<(), LedgerError> {
        let bytes = encode(product)?;
        self.store.put(&product.product_id, bytes)?;
        tracing::debug!(key = %product.product_id, "stored product");
        Ok(())
    }

    /// Read history slot `slot` of `subject`
    ///
    /// # Errors
    ///
    /// * `MalformedRecord` if the slot holds undecodable bytes
    /// * `StoreUnavailable` if the store read fails
    pub fn slot(&self, subject: &str, slot: SlotIndex) -> Result<SlotEntry, LedgerError> {
        let key = Self::slot_key(subject, slot);
        let Some(bytes) = self.store.get(&key)? else {
            return Ok(SlotEntry::Empty);
        };

        let tx: Transaction = decode(&key, &bytes)?;
        if tx.pan_number == subject {
            Ok(SlotEntry::Record(tx))
        } else {
            Ok(SlotEntry::Foreign {
                key,
                owner: tx.pan_number,
            })
        }
    }

    /// Fetch history slot `slot` of `subject`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(tx))` if the slot holds a valid record of `subject`
    /// * `Ok(None)` if the slot is empty or holds another subject's record
    /// * `Err(MalformedRecord)` if the slot holds undecodable bytes
    pub fn get_transaction(
        &self,
        subject: &str,
        slot: SlotIndex,
    ) -> Result<Option<Transaction>, LedgerError> {
        match self.slot(subject, slot)? {
            SlotEntry::Record(tx) => Ok(Some(tx)),
            SlotEntry::Empty | SlotEntry::Foreign { .. } => Ok(None),
        }
    }

    /// Fetch the id-addressed transaction `transaction_id` of `subject`
    pub fn get_transaction_by_id(
        &self,
        subject: &str,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, LedgerError> {
        let key = Self::id_key(subject, transaction_id);
        self.store
            .get(&key)?
            .map(|bytes| decode(&key, &bytes))
            .transpose()
    }

    /// Fetch the product stored under `product_id`
    pub fn get_product(&self, product_id: &str) -> Result<Option<Product>, LedgerError> {
        self.store
            .get(product_id)?
            .map(|bytes| decode(product_id, &bytes))
            .transpose()
    }

    /// First empty history slot of `subject` below `max_slots`
    ///
    /// Only presence is checked: a slot holding a malformed record or another
    /// subject's record counts as occupied and is never overwritten by an
    /// append.
    ///
    /// # Errors
    ///
    /// Returns `SlotsExhausted` if every slot in the window is occupied.
    pub fn next_slot(&self, subject: &str, max_slots: usize) -> Result<SlotIndex, LedgerError> {
        for slot in slot_window(max_slots) {
            if !self.store.contains(&Self::slot_key(subject, slot))? {
                return Ok(slot);
            }
        }
        Err(LedgerError::slots_exhausted(subject, max_slots))
    }

    /// Store `tx` in the first empty slot of its subject's history
    ///
    /// # Returns
    ///
    /// The slot the transaction was written to
    pub fn append_transaction(
        &mut self,
        tx: &Transaction,
        max_slots: usize,
    ) -> Result<SlotIndex, LedgerError> {
        let slot = self.next_slot(&tx.pan_number, max_slots)?;
        self.put_transaction(&tx.pan_number, slot, tx)?;
        Ok(slot)
    }

    /// Write raw bytes under an arbitrary key
    pub fn write(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.store.put(key, value)
    }

    /// Read raw bytes stored under an arbitrary key
    pub fn read(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.store.get(key)
    }

    /// Keys starting with `prefix`, in key order
    pub fn keys(&self, prefix: &str) -> Result<Vec<String>, LedgerError> {
        Ok(self
            .store
            .scan_prefix(prefix)?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    /// Write the genesis marker
    pub fn init(&mut self, value: Vec<u8>) -> Result<(), LedgerError> {
        self.store.put(GENESIS_KEY, value)
    }
}

/// Slot indices `0..max_slots`, saturating at the largest slot index
pub(crate) fn slot_window(max_slots: usize) -> impl Iterator<Item = SlotIndex> {
    let end = SlotIndex::try_from(max_slots).unwrap_or(SlotIndex::MAX);
    0..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryRecordStore;
    use crate::types::ErrorKind;

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

    fn repository() -> LedgerRepository<MemoryRecordStore> {
        LedgerRepository::new(MemoryRecordStore::new())
    }

    #[test]
    fn test_slot_keys_are_unpadded_concatenation() {
        let mut repo = repository();
        repo.put_transaction("PAN1", 0, &tx("PAN1", "LOAN", "T1", 1.0))
            .unwrap();
        repo.put_transaction("PAN1", 12, &tx("PAN1", "EMI", "T2", 1.0))
            .unwrap();

        assert_eq!(repo.keys("").unwrap(), vec!["PAN10", "PAN112"]);
    }

    #[test]
    fn test_put_and_get_transaction_slot() {
        let mut repo = repository();
        let stored = tx("PAN1", "EMI", "T1", 12000.0);
        repo.put_transaction("PAN1", 3, &stored).unwrap();

        assert_eq!(repo.get_transaction("PAN1", 3).unwrap(), Some(stored));
        assert_eq!(repo.get_transaction("PAN1", 4).unwrap(), None);
        assert_eq!(repo.get_transaction("PAN2", 3).unwrap(), None);
    }

    #[test]
    fn test_put_transaction_rejects_foreign_subject() {
        let mut repo = repository();
        let err = repo
            .put_transaction("PAN2", 0, &tx("PAN1", "EMI", "T1", 1.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(repo.store().is_empty());
    }

    #[test]
    fn test_id_addressed_lookup() {
        let mut repo = repository();
        let stored = tx("PAN1", "OUTSTANDING", "TX9", 400.0);
        repo.put_transaction_by_id(&stored).unwrap();

        assert_eq!(repo.keys("").unwrap(), vec!["PAN1TX9"]);
        assert_eq!(
            repo.get_transaction_by_id("PAN1", "TX9").unwrap(),
            Some(stored)
        );
        assert_eq!(repo.get_transaction_by_id("PAN1", "TX8").unwrap(), None);
    }

    #[test]
    fn test_product_round_trip() {
        let mut repo = repository();
        let product = Product {
            name: "Home loan".to_string(),
            amount: 250000.0,
            owner: "bank".to_string(),
            product_id: "P100".to_string(),
        };
        repo.put_product(&product).unwrap();

        assert_eq!(repo.get_product("P100").unwrap(), Some(product));
        assert_eq!(repo.get_product("P101").unwrap(), None);
    }

    #[test]
    fn test_get_transaction_surfaces_malformed_record() {
        let mut repo = repository();
        repo.write("PAN10", b"{PanNumber:PAN1}".to_vec()).unwrap();

        let err = repo.get_transaction("PAN1", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn test_append_fills_slots_in_order() {
        let mut repo = repository();
        for (expected, id) in ["T0", "T1", "T2"].iter().enumerate() {
            let slot = repo
                .append_transaction(&tx("PAN1", "EMI", id, 1.0), 100)
                .unwrap();
            assert_eq!(slot as usize, expected);
        }
        assert_eq!(repo.next_slot("PAN1", 100).unwrap(), 3);
        assert_eq!(repo.next_slot("PAN2", 100).unwrap(), 0);
    }

    #[test]
    fn test_append_treats_malformed_slot_as_occupied() {
        let mut repo = repository();
        repo.write("PAN10", b"garbage".to_vec()).unwrap();

        let slot = repo
            .append_transaction(&tx("PAN1", "EMI", "T1", 1.0), 100)
            .unwrap();
        assert_eq!(slot, 1);
        assert_eq!(repo.read("PAN10").unwrap(), Some(b"garbage".to_vec()));
    }

    fn colliding_subjects() -> LedgerRepository<MemoryRecordStore> {
        let mut repo = repository();
        // PAN11 slots 0 and 1 are keys PAN110 and PAN111, i.e. PAN1 slots 10 and 11
        repo.append_transaction(&tx("PAN11", "LOAN", "L0", 1000.0), 100)
            .unwrap();
        repo.append_transaction(&tx("PAN11", "EMI", "E1", 900.0), 100)
            .unwrap();
        for slot in 0..10 {
            repo.put_transaction("PAN1", slot, &tx("PAN1", "OTHER", "X", 1.0))
                .unwrap();
        }
        repo
    }

    #[test]
    fn test_slot_of_other_subject_is_foreign() {
        let repo = colliding_subjects();

        assert_eq!(
            repo.slot("PAN1", 10).unwrap(),
            SlotEntry::Foreign {
                key: "PAN110".to_string(),
                owner: "PAN11".to_string(),
            }
        );
        assert_eq!(repo.get_transaction("PAN1", 10).unwrap(), None);
        assert_eq!(
            repo.get_transaction("PAN11", 0).unwrap().map(|tx| tx.amount),
            Some(1000.0)
        );
        assert_eq!(repo.slot("PAN1", 12).unwrap(), SlotEntry::Empty);
    }

    #[test]
    fn test_append_never_overwrites_other_subject() {
        let mut repo = colliding_subjects();

        let slot = repo
            .append_transaction(&tx("PAN1", "LOAN", "L1", 5000.0), 100)
            .unwrap();
        assert_eq!(slot, 12);
        assert_eq!(
            repo.get_transaction("PAN11", 0).unwrap().map(|tx| tx.transaction_id),
            Some("L0".to_string())
        );
    }

    #[test]
    fn test_append_into_full_window() {
        let mut repo = repository();
        repo.append_transaction(&tx("PAN1", "EMI", "T0", 1.0), 2)
            .unwrap();
        repo.append_transaction(&tx("PAN1", "EMI", "T1", 1.0), 2)
            .unwrap();

        let err = repo
            .append_transaction(&tx("PAN1", "EMI", "T2", 1.0), 2)
            .unwrap_err();
        assert_eq!(err, LedgerError::slots_exhausted("PAN1", 2));
    }

    #[test]
    fn test_init_writes_genesis() {
        let mut repo = repository();
        repo.init(b"hello".to_vec()).unwrap();
        assert_eq!(repo.read(GENESIS_KEY).unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_slot_window_bounds() {
        assert_eq!(slot_window(0).count(), 0);
        assert_eq!(slot_window(100).last(), Some(99));
    }
}
