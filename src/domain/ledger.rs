use super::account::{Account, Amount, Balance};
use crate::error::LedgerError;

/// The fixed, ordered roster of accounts and their balances.
///
/// Accounts are established at construction and never added or removed. The
/// router addresses them by position; balance queries go by token.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountLedger {
    accounts: Vec<Account>,
}

impl AccountLedger {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get_balance(&self, token: &str) -> Result<Balance, LedgerError> {
        self.position(token)
            .map(|index| self.accounts[index].balance)
            .ok_or_else(|| LedgerError::UnknownAccount(token.to_string()))
    }

    /// Debits `token`, failing without side effects when the balance is short.
    pub fn debit(&mut self, token: &str, amount: Amount) -> Result<(), LedgerError> {
        let index = self
            .position(token)
            .ok_or_else(|| LedgerError::UnknownAccount(token.to_string()))?;
        self.accounts[index].debit(amount)
    }

    pub fn position(&self, token: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.token == token)
    }

    pub fn account_at(&self, index: usize) -> Option<&Account> {
        self.accounts.get(index)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }
}
