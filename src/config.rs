use crate::domain::account::{Account, Balance};
use crate::error::{PaymentError, Result};
use clap::ValueEnum;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_STATE_FILE: &str = "payment_state.json";
/// Tracing filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "payment_router=warn";

/// How many accounts the router may try before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RoutingPolicy {
    /// Try the cursor account, then its successor.
    #[default]
    TwoCandidate,
    /// Try every account once, starting at the cursor.
    FullRotation,
}

/// A roster entry as given on the command line: `TOKEN=BALANCE`.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSpec {
    pub token: String,
    pub balance: Balance,
}

impl FromStr for AccountSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (token, balance) = s
            .split_once('=')
            .ok_or_else(|| format!("expected TOKEN=BALANCE, got '{s}'"))?;
        let token = token.trim();
        if token.is_empty() {
            return Err(format!("empty token in '{s}'"));
        }
        let balance = Decimal::from_str(balance.trim())
            .map_err(|e| format!("invalid balance in '{s}': {e}"))?;
        Ok(Self {
            token: token.to_string(),
            balance: Balance::new(balance),
        })
    }
}

/// Deployment configuration for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Ordered roster with the balances used when no state has been saved yet.
    pub accounts: Vec<AccountSpec>,
    pub state_file: PathBuf,
    pub policy: RoutingPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            accounts: vec![
                AccountSpec {
                    token: "token1".to_string(),
                    balance: Balance::new(dec!(1000)),
                },
                AccountSpec {
                    token: "token2".to_string(),
                    balance: Balance::new(dec!(2000)),
                },
            ],
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            policy: RoutingPolicy::default(),
        }
    }
}

impl LedgerConfig {
    /// Rejects empty rosters, duplicate tokens and negative starting balances.
    pub fn validate(&self) -> Result<()> {
        if self.accounts.is_empty() {
            return Err(PaymentError::Config("at least one account is required".into()));
        }
        let mut seen = HashSet::new();
        for spec in &self.accounts {
            if !seen.insert(spec.token.as_str()) {
                return Err(PaymentError::Config(format!(
                    "duplicate account '{}'",
                    spec.token
                )));
            }
            if spec.balance.is_negative() {
                return Err(PaymentError::Config(format!(
                    "account '{}' has a negative starting balance",
                    spec.token
                )));
            }
        }
        Ok(())
    }

    pub fn default_accounts(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .map(|spec| Account::new(spec.token.clone(), spec.balance))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let config = LedgerConfig::default();
        let accounts = config.default_accounts();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0], Account::new("token1", Balance::new(dec!(1000))));
        assert_eq!(accounts[1], Account::new("token2", Balance::new(dec!(2000))));
        assert_eq!(config.state_file, PathBuf::from("payment_state.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_account_spec_parsing() {
        let spec: AccountSpec = "bank_a = 150.5".parse().unwrap();
        assert_eq!(spec.token, "bank_a");
        assert_eq!(spec.balance, Balance::new(dec!(150.5)));

        assert!("bank_a".parse::<AccountSpec>().is_err());
        assert!("=10".parse::<AccountSpec>().is_err());
        assert!("bank_a=lots".parse::<AccountSpec>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_rosters() {
        let mut config = LedgerConfig {
            accounts: vec![],
            ..LedgerConfig::default()
        };
        assert!(matches!(config.validate(), Err(PaymentError::Config(_))));

        config.accounts = vec!["a=1".parse().unwrap(), "a=2".parse().unwrap()];
        assert!(matches!(config.validate(), Err(PaymentError::Config(_))));

        config.accounts = vec!["a=-1".parse().unwrap()];
        assert!(matches!(config.validate(), Err(PaymentError::Config(_))));
    }
}
