//! Error types for the credit score ledger
//!
//! Every failure carries a stable [`ErrorKind`] tag plus a human-readable
//! message. Nothing in the core retries; errors go straight back to the
//! immediate caller.
//!
//! # Error Categories
//!
//! - **Caller errors**: wrong argument count or shape, unknown functions
//! - **Lookup errors**: point lookups that find nothing
//! - **Data errors**: stored records that cannot be decoded
//! - **Scoring errors**: empty history, zero loan amount
//! - **Store errors**: adapter-level I/O failures

use std::fmt;
use thiserror::Error;

/// Stable tag identifying the category of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    MalformedRecord,
    NoHistory,
    UndefinedScore,
    StoreUnavailable,
    SlotsExhausted,
}

impl ErrorKind {
    /// Tag as printed in user-facing output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::MalformedRecord => "MalformedRecord",
            ErrorKind::NoHistory => "NoHistory",
            ErrorKind::UndefinedScore => "UndefinedScore",
            ErrorKind::StoreUnavailable => "StoreUnavailable",
            ErrorKind::SlotsExhausted => "SlotsExhausted",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Wrong argument count or an argument that cannot be used
    #[error("Invalid argument for {operation}: {message}")]
    InvalidArgument {
        /// Operation that rejected the argument
        operation: String,
        /// What was wrong
        message: String,
    },

    /// A point lookup found no record
    #[error("Record not found: {record}")]
    NotFound {
        /// Description of the record that was looked up
        record: String,
    },

    /// A stored record could not be decoded
    ///
    /// Reconstruction aborts on this error unless configured to skip.
    #[error("Malformed record at key '{key}': {message}")]
    MalformedRecord {
        /// Ledger key holding the bad record
        key: String,
        /// Decoder failure
        message: String,
    },

    /// The reconstructed history is empty
    #[error("No transaction history to score")]
    NoHistory,

    /// The score cannot be computed from the history
    #[error("Score is undefined: {reason}")]
    UndefinedScore {
        /// Why the formula has no value
        reason: String,
    },

    /// The record store failed
    ///
    /// Fatal for the current request only.
    #[error("Record store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the store failure
        message: String,
    },

    /// Every slot in the scan window is already occupied
    #[error("All {max_slots} slots are occupied for subject '{subject}'")]
    SlotsExhausted {
        /// Subject whose history is full
        subject: String,
        /// Size of the slot window
        max_slots: usize,
    },
}

// Store adapters surface I/O failures as StoreUnavailable
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::StoreUnavailable {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let message = match error.position() {
            Some(pos) => format!("ledger file line {}: {}", pos.line(), error),
            None => error.to_string(),
        };
        LedgerError::StoreUnavailable { message }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Stable category tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            LedgerError::NoHistory => ErrorKind::NoHistory,
            LedgerError::UndefinedScore { .. } => ErrorKind::UndefinedScore,
            LedgerError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            LedgerError::SlotsExhausted { .. } => ErrorKind::SlotsExhausted,
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(operation: &str, message: impl Into<String>) -> Self {
        LedgerError::InvalidArgument {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error for a wrong argument count
    pub fn argument_count(operation: &str, expected: usize, actual: usize) -> Self {
        LedgerError::invalid_argument(
            operation,
            format!("expected {} arguments, got {}", expected, actual),
        )
    }

    /// Create a NotFound error
    pub fn not_found(record: impl Into<String>) -> Self {
        LedgerError::NotFound {
            record: record.into(),
        }
    }

    /// Create a MalformedRecord error
    pub fn malformed_record(key: &str, message: impl Into<String>) -> Self {
        LedgerError::MalformedRecord {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Create an UndefinedScore error
    pub fn undefined_score(reason: impl Into<String>) -> Self {
        LedgerError::UndefinedScore {
            reason: reason.into(),
        }
    }

    /// Create a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        LedgerError::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create a SlotsExhausted error
    pub fn slots_exhausted(subject: &str, max_slots: usize) -> Self {
        LedgerError::SlotsExhausted {
            subject: subject.to_string(),
            max_slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_argument(
        LedgerError::argument_count("addproduct", 4, 2),
        "Invalid argument for addproduct: expected 4 arguments, got 2"
    )]
    #[case::not_found(
        LedgerError::not_found("product 'P1'"),
        "Record not found: product 'P1'"
    )]
    #[case::malformed(
        LedgerError::malformed_record("PAN10", "missing field `Amount`"),
        "Malformed record at key 'PAN10': missing field `Amount`"
    )]
    #[case::no_history(LedgerError::NoHistory, "No transaction history to score")]
    #[case::undefined_score(
        LedgerError::undefined_score("loan amount is zero"),
        "Score is undefined: loan amount is zero"
    )]
    #[case::store_unavailable(
        LedgerError::store_unavailable("disk full"),
        "Record store unavailable: disk full"
    )]
    #[case::slots_exhausted(
        LedgerError::slots_exhausted("PAN1", 100),
        "All 100 slots are occupied for subject 'PAN1'"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_argument(LedgerError::invalid_argument("read", "x"), ErrorKind::InvalidArgument)]
    #[case::not_found(LedgerError::not_found("x"), ErrorKind::NotFound)]
    #[case::malformed(LedgerError::malformed_record("k", "x"), ErrorKind::MalformedRecord)]
    #[case::no_history(LedgerError::NoHistory, ErrorKind::NoHistory)]
    #[case::undefined(LedgerError::undefined_score("x"), ErrorKind::UndefinedScore)]
    #[case::store(LedgerError::store_unavailable("x"), ErrorKind::StoreUnavailable)]
    #[case::exhausted(LedgerError::slots_exhausted("s", 1), ErrorKind::SlotsExhausted)]
    fn test_error_kind(#[case] error: LedgerError, #[case] expected: ErrorKind) {
        assert_eq!(error.kind(), expected);
    }

    #[test]
    fn test_kind_display_matches_tag() {
        assert_eq!(ErrorKind::UndefinedScore.to_string(), "UndefinedScore");
        assert_eq!(ErrorKind::NoHistory.to_string(), "NoHistory");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert_eq!(error.kind(), ErrorKind::StoreUnavailable);
        assert_eq!(
            error.to_string(),
            "Record store unavailable: Permission denied"
        );
    }
}
