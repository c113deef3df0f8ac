//! Score output encoding
//!
//! Renders a [`ScoreResult`] into the bytes returned to callers. The decimal
//! string is the canonical form; the 8-byte little-endian `f64` form serves
//! binary-protocol callers.

use crate::types::ScoreResult;
use clap::ValueEnum;

/// Output representation of a computed score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Shortest decimal string, e.g. `624` or `742.5`
    #[default]
    Decimal,

    /// IEEE-754 double, 8 bytes little-endian
    Binary,
}

/// Encode a score result in the requested format
pub fn encode_score(result: &ScoreResult, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Decimal => format_decimal(result.score).into_bytes(),
        OutputFormat::Binary => result.score.to_le_bytes().to_vec(),
    }
}

/// Shortest round-trip decimal form of a score, without exponent or `.0`
///
/// `f64`'s `Display` already produces the minimal digits needed to round-trip
/// and never falls back to exponent notation.
pub fn format_decimal(score: f64) -> String {
    format!("{}", score)
}
