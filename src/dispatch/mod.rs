//! Named operation dispatch
//!
//! Routes a function name and an ordered list of string arguments to the
//! matching [`Ledger`] operation and returns the response bytes. This is the
//! calling convention the ledger has always been driven through: strings in,
//! bytes out.
//!
//! # Functions
//!
//! | Function             | Arguments                                                  | Response            |
//! |----------------------|------------------------------------------------------------|---------------------|
//! | `init`               | `<value>`                                                  | empty               |
//! | `write`              | `<key> <value>`                                            | empty               |
//! | `read`               | `<key>`                                                    | raw bytes           |
//! | `keys`               | `<prefix>`                                                 | one key per line    |
//! | `addtransaction`     | `<pan> <type> <loanId> <txId> <amount> <date> <institution>` | assigned slot     |
//! | `indextransaction`   | same as `addtransaction`                                   | empty               |
//! | `addproduct`         | `<name> <amount> <owner> <productid>`                      | empty               |
//! | `readtransaction`    | `<pan>`                                                    | encoded score       |
//! | `readslot`           | `<pan> <slot>`                                             | JSON record         |
//! | `readonetransaction` | `<pan> <txId>`                                             | JSON record         |
//! | `readproduct`        | `<productid>`                                              | JSON record         |

pub mod arguments;

use crate::core::{Ledger, RecordStore};
use crate::io::codec::encode;
use crate::io::result_encoder::{encode_score, OutputFormat};
use crate::types::LedgerError;
use arguments::{
    expect_args, non_empty, parse_slot, product_from_args, transaction_from_args,
};
use clap::ValueEnum;

/// Operations reachable through [`dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Function {
    /// Write the genesis marker
    Init,
    /// Write a raw key/value pair
    Write,
    /// Read a raw value
    Read,
    /// List keys with a prefix
    Keys,
    /// Append a transaction to its subject's history
    #[value(alias = "addtransaction")]
    AddTransaction,
    /// Store a transaction under its id-addressed key
    #[value(alias = "indextransaction")]
    IndexTransaction,
    /// Store a product
    #[value(alias = "addproduct")]
    AddProduct,
    /// Compute a subject's score
    #[value(aliases = ["readtransaction", "score"])]
    ReadTransaction,
    /// Read one history slot
    #[value(alias = "readslot")]
    ReadSlot,
    /// Read an id-addressed transaction
    #[value(alias = "readonetransaction")]
    ReadOneTransaction,
    /// Read a product
    #[value(alias = "readproduct")]
    ReadProduct,
}

impl Function {
    /// Resolve a function by name
    ///
    /// Accepts the kebab-case names (`add-transaction`) and the compact
    /// names (`addtransaction`), case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, LedgerError> {
        <Self as ValueEnum>::from_str(name, true).map_err(|_| {
            LedgerError::invalid_argument("dispatch", format!("unknown function '{}'", name))
        })
    }

    /// Compact name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Function::Init => "init",
            Function::Write => "write",
            Function::Read => "read",
            Function::Keys => "keys",
            Function::AddTransaction => "addtransaction",
            Function::IndexTransaction => "indextransaction",
            Function::AddProduct => "addproduct",
            Function::ReadTransaction => "readtransaction",
            Function::ReadSlot => "readslot",
            Function::ReadOneTransaction => "readonetransaction",
            Function::ReadProduct => "readproduct",
        }
    }

    /// Whether the function writes to the ledger
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Function::Init
                | Function::Write
                | Function::AddTransaction
                | Function::IndexTransaction
                | Function::AddProduct
        )
    }
}

/// Run `function` with `args` against `ledger`
///
/// # Arguments
///
/// * `ledger` - Ledger to operate on
/// * `function` - Operation to run
/// * `args` - Ordered string arguments, see the module table
/// * `format` - Output format for computed scores
///
/// # Errors
///
/// `InvalidArgument` for wrong argument counts or unparsable arguments;
/// otherwise whatever the ledger operation returns.
#[tracing::instrument(level = "debug", skip(ledger, function, args), fields(function = function.name(), argc = args.len()))]
pub fn dispatch<S: RecordStore>(
    ledger: &mut Ledger<S>,
    function: Function,
    args: &[String],
    format: OutputFormat,
) -> Result<Vec<u8>, LedgerError> {
    let operation = function.name();

    match function {
        Function::Init => {
            let args = expect_args(operation, args, 1)?;
            ledger.init(args[0].as_bytes())?;
            Ok(Vec::new())
        }
        Function::Write => {
            let args = expect_args(operation, args, 2)?;
            ledger.write(&args[0], args[1].as_bytes())?;
            Ok(Vec::new())
        }
        Function::Read => {
            let args = expect_args(operation, args, 1)?;
            ledger.read(&args[0])
        }
        Function::Keys => {
            let args = expect_args(operation, args, 1)?;
            Ok(ledger.keys(&args[0])?.join("\n").into_bytes())
        }
        Function::AddTransaction => {
            let tx = transaction_from_args(operation, args)?;
            let slot = ledger.add_transaction(&tx)?;
            Ok(slot.to_string().into_bytes())
        }
        Function::IndexTransaction => {
            let tx = transaction_from_args(operation, args)?;
            ledger.index_transaction(&tx)?;
            Ok(Vec::new())
        }
        Function::AddProduct => {
            let product = product_from_args(operation, args)?;
            ledger.add_product(&product)?;
            Ok(Vec::new())
        }
        Function::ReadTransaction => {
            let args = expect_args(operation, args, 1)?;
            let subject = non_empty(operation, "PAN number", &args[0])?;
            let result = ledger.compute_score(subject)?;
            Ok(encode_score(&result, format))
        }
        Function::ReadSlot => {
            let args = expect_args(operation, args, 2)?;
            let slot = parse_slot(operation, &args[1])?;
            encode(&ledger.get_transaction(&args[0], slot)?)
        }
        Function::ReadOneTransaction => {
            let args = expect_args(operation, args, 2)?;
            encode(&ledger.get_transaction_by_id(&args[0], &args[1])?)
        }
        Function::ReadProduct => {
            let args = expect_args(operation, args, 1)?;
            encode(&ledger.get_product(&args[0])?)
        }
    }
}

/// Resolve `name` and run it; convenience for callers holding raw strings
pub fn dispatch_named<S: RecordStore>(
    ledger: &mut Ledger<S>,
    name: &str,
    args: &[String],
    format: OutputFormat,
) -> Result<Vec<u8>, LedgerError> {
    dispatch(ledger, Function::from_name(name)?, args, format)
}
