//! Core business logic module
//!
//! This module contains the ledger and scoring components:
//! - `traits` - The record store abstraction
//! - `record_store` - Single-threaded in-memory store
//! - `shared_store` - Concurrent in-memory store
//! - `repository` - Key construction and record persistence
//! - `history` - Ordered history reconstruction from slot keys
//! - `score_engine` - Aggregation and bounded scoring
//! - `ledger` - Public operations tying the above together

pub mod history;
pub mod ledger;
pub mod record_store;
pub mod repository;
pub mod score_engine;
pub mod shared_store;
pub mod traits;

pub use history::{HistoryReconstructor, MalformedPolicy, DEFAULT_MAX_SLOTS};
pub use ledger::{Ledger, ScoreConfig};
pub use record_store::MemoryRecordStore;
pub use repository::{LedgerRepository, SlotEntry};
pub use shared_store::SharedRecordStore;
pub use traits::RecordStore;
