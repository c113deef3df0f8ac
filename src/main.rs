//! Credit score ledger CLI
//!
//! Command-line front end that runs one named ledger operation against a
//! ledger file.
//!
//! # Usage
//!
//! ```bash
//! credit-ledger addtransaction PAN1 LOAN L1 T1 100000 2017-01-01 SBI
//! credit-ledger addtransaction PAN1 EMI L1 T2 12000 2017-02-01 SBI
//! credit-ledger addtransaction PAN1 OUTSTANDING L1 T3 4000 2017-03-01 SBI
//! credit-ledger score PAN1
//! credit-ledger --ledger other.csv --format binary score PAN1 > score.bin
//! credit-ledger addproduct "Gold loan" 5000 bank P1
//! credit-ledger readproduct P1
//! ```
//!
//! Operation output goes to stdout; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (the error kind and message are printed to stderr)

use credit_score_ledger::cli::{self, CliArgs};
use credit_score_ledger::core::Ledger;
use credit_score_ledger::dispatch::{dispatch, Function};
use credit_score_ledger::io::{FileRecordStore, OutputFormat};
use credit_score_ledger::LedgerError;
use std::io::Write;
use std::process;

fn main() {
    let args = cli::parse_args();
    cli::init_logging(args.log_level.as_deref());

    if let Err(e) = run(&args) {
        eprintln!("Error [{}]: {}", e.kind(), e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), LedgerError> {
    let store = FileRecordStore::open(&args.ledger)?;
    let mut ledger = Ledger::with_config(store, args.to_score_config());

    let output = dispatch(&mut ledger, args.function, &args.args, args.format)?;

    if args.function.mutates() {
        ledger.store_mut().flush()?;
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output)?;
    let binary_score =
        args.function == Function::ReadTransaction && args.format == OutputFormat::Binary;
    if !output.is_empty() && !binary_score {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
