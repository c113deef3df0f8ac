//! I/O module
//!
//! Handles everything that turns domain values into bytes and back.
//!
//! # Components
//!
//! - `codec` - JSON encoding of transaction and product records
//! - `result_encoder` - Score output in decimal or binary form
//! - `file_store` - CSV-file-backed record store used by the CLI

pub mod codec;
pub mod file_store;
pub mod result_encoder;

pub use codec::{decode, encode, LedgerRecord};
pub use file_store::FileRecordStore;
pub use result_encoder::{encode_score, OutputFormat};
