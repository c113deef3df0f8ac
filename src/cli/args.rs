use crate::core::{MalformedPolicy, ScoreConfig};
use crate::dispatch::Function;
use crate::io::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Record transactions and products in a ledger and compute credit scores
#[derive(Parser, Debug)]
#[command(name = "credit-ledger")]
#[command(
    about = "Record transactions and products in a ledger and compute credit scores",
    long_about = None
)]
pub struct CliArgs {
    /// Operation to run
    #[arg(value_name = "FUNCTION", help = "Operation to run (e.g. addtransaction, score)")]
    pub function: Function,

    /// Positional arguments of the operation
    #[arg(
        value_name = "ARGS",
        allow_hyphen_values = true,
        trailing_var_arg = true,
        help = "Ordered string arguments for the operation"
    )]
    pub args: Vec<String>,

    /// Ledger file path
    #[arg(
        long = "ledger",
        value_name = "PATH",
        env = "CREDIT_LEDGER_PATH",
        default_value = "ledger.csv",
        help = "Path to the ledger file (created on first write)"
    )]
    pub ledger: PathBuf,

    /// History scan window
    #[arg(
        long = "max-slots",
        value_name = "COUNT",
        help = "Number of history slots scanned per subject (default: 100)"
    )]
    pub max_slots: Option<usize>,

    /// Malformed history record handling
    #[arg(
        long = "on-malformed",
        value_name = "POLICY",
        default_value = "abort",
        help = "What to do with undecodable history records: 'abort' or 'skip'"
    )]
    pub on_malformed: MalformedPolicy,

    /// Score output format
    #[arg(
        long = "format",
        value_name = "FORMAT",
        default_value = "decimal",
        help = "Score output: 'decimal' string or 'binary' little-endian f64"
    )]
    pub format: OutputFormat,

    /// Log filter
    #[arg(
        long = "log-level",
        value_name = "FILTER",
        help = "Log filter such as 'info' or 'credit_score_ledger=debug' (default: RUST_LOG or 'warn')"
    )]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Create a ScoreConfig from CLI arguments
    ///
    /// Falls back to the default scan window when `--max-slots` is absent.
    pub fn to_score_config(&self) -> ScoreConfig {
        match self.max_slots {
            Some(max_slots) => ScoreConfig::new(max_slots, self.on_malformed),
            None => ScoreConfig {
                on_malformed: self.on_malformed,
                ..ScoreConfig::default()
            },
        }
    }
}
