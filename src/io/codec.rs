//! Record codec
//!
//! Encodes ledger records as JSON objects using the field names already
//! present in stored ledger data (`PanNumber`, `Amount`, ... for
//! transactions; `name`, `productid`, ... for products). The same codec is
//! applied on every write and every read.
//!
//! Decoding is strict: bytes that are not a JSON object, missing or mistyped
//! fields, and records that violate field invariants all fail with
//! [`LedgerError::MalformedRecord`]. A bad record is never turned into a
//! zero-valued one.

use crate::types::{LedgerError, Product, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record type that can be persisted in the ledger
pub trait LedgerRecord: Serialize + DeserializeOwned {
    /// Name of the record type used in error messages
    const RECORD_NAME: &'static str;

    /// Check field invariants
    fn validate(&self) -> Result<(), String>;
}

impl LedgerRecord for Transaction {
    const RECORD_NAME: &'static str = "transaction";

    fn validate(&self) -> Result<(), String> {
        Transaction::validate(self)
    }
}

impl LedgerRecord for Product {
    const RECORD_NAME: &'static str = "product";

    fn validate(&self) -> Result<(), String> {
        Product::validate(self)
    }
}

/// Encode a record into the bytes stored in the ledger
///
/// # Errors
///
/// Returns `InvalidArgument` if the record violates its invariants, so that
/// nothing undecodable is ever written.
pub fn encode<R: LedgerRecord>(record: &R) -> Result<Vec<u8>, LedgerError> {
    let operation = format!("encode {}", R::RECORD_NAME);
    record
        .validate()
        .map_err(|message| LedgerError::invalid_argument(&operation, message))?;
    serde_json::to_vec(record).map_err(|e| LedgerError::invalid_argument(&operation, e.to_string()))
}

/// Decode the bytes stored under `key` into a record
///
/// # Errors
///
/// Returns `MalformedRecord` naming `key` when the bytes cannot be parsed or
/// the decoded record violates its invariants.
pub fn decode<R: LedgerRecord>(key: &str, bytes: &[u8]) -> Result<R, LedgerError> {
    let record: R = serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::malformed_record(key, e.to_string()))?;
    record
        .validate()
        .map_err(|message| LedgerError::malformed_record(key, message))?;
    Ok(record)
}
