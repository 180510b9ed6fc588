use super::account::Balance;
use super::payment::PaymentRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The unit of persistence: every balance plus the full payment history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub balances: BTreeMap<String, Balance>,
    #[serde(default)]
    pub history: Vec<PaymentRecord>,
}

impl LedgerSnapshot {
    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        match self.balances.iter().find(|(_, b)| b.is_negative()) {
            Some((token, balance)) => Err(format!("negative balance {balance} for {token}")),
            None => Ok(()),
        }
    }
}

/// Why a stored snapshot could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum AbsentReason {
    Missing,
    Unreadable(String),
    Malformed(String),
}

/// Result of loading persisted state.
///
/// A missing or broken state file is not an error: callers start over from
/// the configured default balances with an empty history.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(LedgerSnapshot),
    Absent(AbsentReason),
}
