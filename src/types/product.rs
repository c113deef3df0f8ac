//! Product records
//!
//! Products share the ledger with transactions but take no part in scoring.

use super::transaction::validate_amount;
use serde::{Deserialize, Serialize};

/// A product persisted under its own id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub amount: f64,
    pub owner: String,
    #[serde(rename = "productid")]
    pub product_id: String,
}

impl Product {
    /// Check that the product id is non-empty and the amount is valid
    pub fn validate(&self) -> Result<(), String> {
        if self.product_id.trim().is_empty() {
            return Err("productid must not be empty".to_string());
        }
        validate_amount(self.amount)
    }
}
