//! Conversion of string argument lists into domain values

use crate::types::{LedgerError, Product, SlotIndex, Transaction};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Check that exactly `expected` arguments were supplied
pub fn expect_args<'a>(
    operation: &str,
    args: &'a [String],
    expected: usize,
) -> Result<&'a [String], LedgerError> {
    if args.len() != expected {
        return Err(LedgerError::argument_count(operation, expected, args.len()));
    }
    Ok(args)
}

/// Parse a non-negative decimal amount
///
/// Only plain decimal notation is accepted; `NaN`, `inf` and exponent forms
/// that a float parser would take are rejected.
pub fn parse_amount(operation: &str, raw: &str) -> Result<f64, LedgerError> {
    let amount = Decimal::from_str(raw.trim()).map_err(|_| {
        LedgerError::invalid_argument(operation, format!("invalid amount '{}'", raw))
    })?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::invalid_argument(
            operation,
            format!("amount '{}' must not be negative", raw),
        ));
    }
    amount.abs().to_f64().ok_or_else(|| {
        LedgerError::invalid_argument(operation, format!("amount '{}' is out of range", raw))
    })
}

/// Parse a slot index
pub fn parse_slot(operation: &str, raw: &str) -> Result<SlotIndex, LedgerError> {
    raw.trim().parse::<SlotIndex>().map_err(|_| {
        LedgerError::invalid_argument(operation, format!("invalid slot index '{}'", raw))
    })
}

/// Require a non-blank identifier argument
pub fn non_empty<'a>(operation: &str, name: &str, raw: &'a str) -> Result<&'a str, LedgerError> {
    if raw.trim().is_empty() {
        return Err(LedgerError::invalid_argument(
            operation,
            format!("{} must not be empty", name),
        ));
    }
    Ok(raw)
}

/// Build a transaction from
/// `<pan> <type> <loanId> <txId> <amount> <date> <institution>`
pub fn transaction_from_args(
    operation: &str,
    args: &[String],
) -> Result<Transaction, LedgerError> {
    let args = expect_args(operation, args, 7)?;
    Ok(Transaction {
        pan_number: non_empty(operation, "PAN number", &args[0])?.to_string(),
        transaction_type: args[1].clone(),
        loan_id: args[2].clone(),
        transaction_id: args[3].clone(),
        amount: parse_amount(operation, &args[4])?,
        transaction_date: args[5].clone(),
        institution_name: args[6].clone(),
    })
}

/// Build a product from `<name> <amount> <owner> <productid>`
pub fn product_from_args(operation: &str, args: &[String]) -> Result<Product, LedgerError> {
    let args = expect_args(operation, args, 4)?;
    Ok(Product {
        name: args[0].clone(),
        amount: parse_amount(operation, &args[1])?,
        owner: args[2].clone(),
        product_id: non_empty(operation, "product id", &args[3])?.to_string(),
    })
}
