//! Credit Score Ledger Library
//! # Overview
//!
//! This library records financial transactions and product records in a
//! key-value ledger and derives a bounded creditworthiness score from a
//! subject's accumulated transaction history.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, Product, ScoreResult, errors)
//! - [`cli`] - CLI arguments parsing and log setup
//! - [`core`] - Business logic components:
//!   - [`core::traits`] - The record store abstraction
//!   - [`core::repository`] - Ledger key construction and record persistence
//!   - [`core::history`] - Ordered history reconstruction from slot keys
//!   - [`core::score_engine`] - Aggregation and bounded scoring
//!   - [`core::ledger`] - Public ledger operations
//! - [`io`] - Record codec, score encoding and the file-backed store
//! - [`dispatch`] - Named operations over string argument lists
//!
//! # Transaction Types
//!
//! - **LOAN**: Loan disbursement; the last one in a history sets the loan amount
//! - **EMI**: Instalment payment; summed
//! - **OUTSTANDING**: Outstanding balance report; summed
//! - anything else is stored but ignored by scoring
//!
//! # Scoring
//!
//! `score = clamp(600 + 300 * (EMI - OUTSTANDING) / LOAN, 300, 900)`,
//! with `NoHistory` for an empty history and `UndefinedScore` for a zero loan
//! amount.

// Module declarations
pub mod cli;
pub mod core;
pub mod dispatch;
pub mod io;
pub mod types;

pub use self::core::{Ledger, LedgerRepository, MemoryRecordStore, RecordStore, SharedRecordStore};
pub use io::{FileRecordStore, OutputFormat};
pub use types::{
    ErrorKind, LedgerError, Product, ScoreAggregate, ScoreResult, SlotIndex, Transaction,
    TransactionKind,
};
