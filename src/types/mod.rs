//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Transaction records, slot indices and classification
//! - `product`: Product records
//! - `score`: Score results and aggregates
//! - `error`: Error types for the ledger

pub mod error;
pub mod product;
pub mod score;
pub mod transaction;

pub use error::{ErrorKind, LedgerError};
pub use product::Product;
pub use score::{ScoreAggregate, ScoreResult};
pub use transaction::{SlotIndex, Transaction, TransactionKind};
