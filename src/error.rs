use miette::Diagnostic;
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the account ledger itself.
#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum LedgerError {
    #[error("unknown account: {0}")]
    #[diagnostic(code(ledger::unknown_account))]
    UnknownAccount(String),
    #[error("insufficient funds in {token}: balance {balance}, requested {requested}")]
    #[diagnostic(code(ledger::insufficient_funds))]
    InsufficientFunds {
        token: String,
        balance: Decimal,
        requested: Decimal,
    },
}

/// Failures of the token/key lookup file.
///
/// The router folds all of these into a single routing failure, but they stay
/// distinct here so the CLI can say exactly what went wrong.
#[derive(Error, Diagnostic, Debug)]
pub enum KeyError {
    #[error("key file not found: {}", .0.display())]
    #[diagnostic(code(keys::file_not_found))]
    FileNotFound(PathBuf),
    #[error("invalid key file {}: {reason}", path.display())]
    #[diagnostic(code(keys::invalid_format))]
    InvalidFormat { path: PathBuf, reason: String },
    #[error("key '{key}' does not exist in {}", path.display())]
    #[diagnostic(code(keys::missing_key))]
    MissingKey { key: String, path: PathBuf },
}

#[derive(Error, Diagnostic, Debug)]
pub enum RoutingError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ledger(#[from] LedgerError),
    #[error("no account has sufficient funds for order {order_num} (${amount})")]
    #[diagnostic(code(routing::insufficient_funds))]
    InsufficientFunds { order_num: i64, amount: Decimal },
    /// Raised after the debit has already been applied in memory.
    #[error("payment debited from {token} but its key could not be resolved")]
    #[diagnostic(code(routing::key_resolution))]
    KeyResolution {
        token: String,
        #[source]
        source: KeyError,
    },
}

#[derive(Error, Diagnostic, Debug)]
pub enum PersistenceError {
    #[error("could not write state file {}: {source}", path.display())]
    #[diagnostic(code(persistence::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize ledger snapshot: {0}")]
    #[diagnostic(code(persistence::serialize))]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Diagnostic, Debug)]
pub enum PaymentError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("IO error: {0}")]
    #[diagnostic(code(payment::io))]
    Io(#[from] std::io::Error),
    #[error("invalid arguments: {0}")]
    #[diagnostic(code(payment::invalid_arguments))]
    InvalidArguments(String),
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(payment::config))]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
