use crate::application::engine::PaymentEngine;
use crate::config::{AccountSpec, DEFAULT_STATE_FILE, LedgerConfig, RoutingPolicy};
use crate::domain::account::Amount;
use crate::domain::payment::{PaymentRecord, PaymentRequest};
use crate::domain::ports::KeyResolverRef;
use crate::error::{KeyError, Result};
use crate::infrastructure::json_file::{JsonKeyResolver, JsonStateStore};
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use rust_decimal::Decimal;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Balanced automatic payment processor
#[derive(Parser, Debug)]
#[command(name = "payment-router", version, disable_version_flag = true)]
pub struct Cli {
    /// JSON file mapping account tokens to their keys
    pub key_file: PathBuf,

    /// Where balances and payment history are kept between runs
    #[arg(long, env = "PAYMENT_STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    /// Account roster with starting balances; repeat to replace the defaults
    #[arg(long = "account", value_name = "TOKEN=BALANCE")]
    pub accounts: Vec<AccountSpec>,

    /// How many accounts are tried before a payment is refused
    #[arg(long, value_enum, default_value_t = RoutingPolicy::TwoCandidate)]
    pub policy: RoutingPolicy,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Settle a payment, e.g. `pay 123` or `pay 123 600`
    Pay {
        /// Order number
        order_num: i64,
        /// Amount to debit
        #[arg(default_value = "500")]
        amount: Decimal,
    },
    /// List every settled payment in chronological order
    List,
}

impl Cli {
    pub fn ledger_config(&self) -> LedgerConfig {
        let defaults = LedgerConfig::default();
        LedgerConfig {
            accounts: if self.accounts.is_empty() {
                defaults.accounts
            } else {
                self.accounts.clone()
            },
            state_file: self.state_file.clone(),
            policy: self.policy,
        }
    }
}

/// The clap command, with `-v/--version` in place of clap's `-V`.
pub fn command() -> clap::Command {
    Cli::command().arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version"),
    )
}

pub fn try_parse_from<I, T>(args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}

/// Executes the parsed command against the JSON-backed ledger.
pub fn run(cli: Cli) -> Result<()> {
    if !cli.key_file.is_file() {
        return Err(KeyError::FileNotFound(cli.key_file).into());
    }

    let config = cli.ledger_config();
    let resolver: KeyResolverRef = Arc::new(JsonKeyResolver::new());
    let store = Box::new(JsonStateStore::new(config.state_file.clone()));
    let mut engine = PaymentEngine::open(&config, store, resolver, &cli.key_file)?;

    match cli.command {
        Commands::Pay { order_num, amount } => {
            let request = PaymentRequest::new(order_num, Amount::new(amount)?);
            let receipt = engine.pay(request)?;
            if let Some(e) = &receipt.persist_error {
                eprintln!("WARNING: could not save state: {e}");
            }
            println!(
                "Order {}: payment of ${} processed via {}.",
                order_num, request.amount, receipt.record.token
            );
        }
        Commands::List => {
            let stdout = io::stdout();
            write_history(stdout.lock(), engine.payments())?;
        }
    }
    Ok(())
}

/// Writes the payment listing, one line per record.
pub fn write_history<'a, W: Write>(
    mut out: W,
    records: impl IntoIterator<Item = &'a PaymentRecord>,
) -> io::Result<()> {
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        writeln!(out, "No payments recorded yet.")?;
        return Ok(());
    }
    writeln!(out, "Payments (chronological):")?;
    for record in records {
        writeln!(
            out,
            " - Order {}: token='{}', key='{}', amount=${:.2}",
            record.order_num, record.token, record.key, record.amount
        )?;
    }
    Ok(())
}
