//! Transaction-related types for the credit score ledger
//!
//! A [`Transaction`] is one financial event (loan disbursement, EMI payment or
//! outstanding balance) recorded against a subject. The serialized field names
//! are the ones already present in stored ledger data.

use serde::{Deserialize, Serialize};

/// Zero-based index of one transaction within a subject's history
pub type SlotIndex = u32;

/// Classification of a transaction for scoring purposes
///
/// The stored `TransactionType` is an open string. Only the three recognized
/// values contribute to a score; everything else is [`TransactionKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// An EMI (equated monthly instalment) payment
    Emi,

    /// An outstanding balance report
    Outstanding,

    /// The loan disbursement amount
    Loan,

    /// Unrecognized type, ignored by scoring
    Other,
}

impl TransactionKind {
    /// Classify a stored transaction type string
    ///
    /// Matching is exact and case-sensitive: `"emi"` is [`TransactionKind::Other`].
    pub fn classify(transaction_type: &str) -> Self {
        match transaction_type {
            "EMI" => TransactionKind::Emi,
            "OUTSTANDING" => TransactionKind::Outstanding,
            "LOAN" => TransactionKind::Loan,
            _ => TransactionKind::Other,
        }
    }
}

/// One financial event tied to a subject and a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    /// Subject identifier (PAN-like, non-empty)
    pub pan_number: String,

    /// Open transaction type string, see [`TransactionKind::classify`]
    pub transaction_type: String,

    /// Loan this event belongs to
    pub loan_id: String,

    /// Identifier unique within the subject's history
    pub transaction_id: String,

    /// Non-negative amount
    pub amount: f64,

    /// Opaque date string, never interpreted
    pub transaction_date: String,

    /// Free-text institution name
    pub institution_name: String,
}

impl Transaction {
    /// Scoring classification of this transaction
    pub fn kind(&self) -> TransactionKind {
        TransactionKind::classify(&self.transaction_type)
    }

    /// Check the field-level invariants of a transaction
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the subject id is non-empty and the amount is a
    ///   non-negative finite number
    /// * `Err(String)` describing the first violated invariant
    pub fn validate(&self) -> Result<(), String> {
        if self.pan_number.trim().is_empty() {
            return Err("PanNumber must not be empty".to_string());
        }
        validate_amount(self.amount)
    }
}

/// Amounts must be finite and non-negative
pub(crate) fn validate_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() {
        return Err(format!("amount {} is not a finite number", amount));
    }
    if amount < 0.0 {
        return Err(format!("amount {} is negative", amount));
    }
    Ok(())
}
