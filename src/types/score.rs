//! Score results produced by the score engine

/// Per-kind totals of a reconstructed history
///
/// Built in a single forward pass over the history. Only ever surfaced as part
/// of a successful [`ScoreResult`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreAggregate {
    /// Sum of all EMI amounts
    pub sum_emi: f64,

    /// Sum of all OUTSTANDING amounts
    pub sum_outstanding: f64,

    /// Amount of the last LOAN record seen (0 if none)
    pub loan_amount: f64,

    pub emi_count: usize,
    pub outstanding_count: usize,
    pub loan_count: usize,

    /// Records whose type is not recognized
    pub other_count: usize,
}

impl ScoreAggregate {
    /// Number of records folded into this aggregate
    pub fn total_count(&self) -> usize {
        self.emi_count + self.outstanding_count + self.loan_count + self.other_count
    }
}

/// Bounded creditworthiness score for one subject
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    /// Final score, always within `[300, 900]`
    pub score: f64,

    /// Score before clamping
    pub raw_score: f64,

    /// Totals the score was derived from
    pub aggregate: ScoreAggregate,
}
