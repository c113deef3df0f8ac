//! Credit score computation
//!
//! The score engine classifies a reconstructed history, folds it into
//! per-kind totals and maps the totals onto a bounded score:
//!
//! ```text
//! diff       = sum(EMI) - sum(OUTSTANDING)
//! percentage = diff / loan_amount * 100
//! spread     = 300 * (percentage / 100)
//! score      = clamp(600 + spread, 300, 900)
//! ```
//!
//! `loan_amount` is the amount of the last `LOAN` record in the history.
//! Records of any other type are counted but do not move the score.
//!
//! # Edge Cases
//!
//! - Empty history: `NoHistory`
//! - Zero loan amount, including a history without any `LOAN` record:
//!   `UndefinedScore`
//! - Non-finite intermediate values that would yield `NaN`: `UndefinedScore`
//! - Any raw score outside `[300, 900]` is saturated at the bound

use crate::types::{LedgerError, ScoreAggregate, ScoreResult, Transaction, TransactionKind};

/// Score assigned before any adjustment
pub const BASE_SCORE: f64 = 600.0;

/// Score movement for a 100% EMI-over-outstanding ratio
pub const SPREAD_RANGE: f64 = 300.0;

/// Lowest score ever returned
pub const MIN_SCORE: f64 = 300.0;

/// Highest score ever returned
pub const MAX_SCORE: f64 = 900.0;

/// Fold a history into per-kind totals in a single forward pass
pub fn aggregate(transactions: &[Transaction]) -> ScoreAggregate {
    transactions
        .iter()
        .fold(ScoreAggregate::default(), |mut totals, tx| {
            match tx.kind() {
                TransactionKind::Emi => {
                    totals.sum_emi += tx.amount;
                    totals.emi_count += 1;
                }
                TransactionKind::Outstanding => {
                    totals.sum_outstanding += tx.amount;
                    totals.outstanding_count += 1;
                }
                TransactionKind::Loan => {
                    // last LOAN record wins
                    totals.loan_amount = tx.amount;
                    totals.loan_count += 1;
                }
                TransactionKind::Other => totals.other_count += 1,
            }
            totals
        })
}

/// Compute the bounded score from precomputed totals
///
/// # Errors
///
/// Returns `UndefinedScore` if the loan amount is zero or the formula has no
/// numeric value.
pub fn score_aggregate(aggregate: ScoreAggregate) -> Result<ScoreResult, LedgerError> {
    if aggregate.loan_amount == 0.0 {
        let reason = if aggregate.loan_count == 0 {
            "history contains no LOAN record"
        } else {
            "loan amount is zero"
        };
        return Err(LedgerError::undefined_score(reason));
    }

    let diff = aggregate.sum_emi - aggregate.sum_outstanding;
    let percentage = (diff / aggregate.loan_amount) * 100.0;
    let spread = SPREAD_RANGE * (percentage / 100.0);
    let raw_score = BASE_SCORE + spread;

    if raw_score.is_nan() {
        return Err(LedgerError::undefined_score(format!(
            "non-numeric result (EMI {}, outstanding {}, loan {})",
            aggregate.sum_emi, aggregate.sum_outstanding, aggregate.loan_amount
        )));
    }

    Ok(ScoreResult {
        score: raw_score.clamp(MIN_SCORE, MAX_SCORE),
        raw_score,
        aggregate,
    })
}

/// Score an ordered history
///
/// # Errors
///
/// * `NoHistory` if `transactions` is empty
/// * `UndefinedScore` as described in [`score_aggregate`]
pub fn score(transactions: &[Transaction]) -> Result<ScoreResult, LedgerError> {
    if transactions.is_empty() {
        return Err(LedgerError::NoHistory);
    }
    score_aggregate(aggregate(transactions))
}
