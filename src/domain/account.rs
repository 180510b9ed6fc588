use crate::error::{LedgerError, PaymentError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// Represents the funds held by an account.
///
/// This is a wrapper around `rust_decimal::Decimal` so balances cannot be mixed
/// up with request amounts. Persisted as a plain JSON number carrying every
/// significant digit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(#[serde(with = "rust_decimal::serde::arbitrary_precision")] pub Decimal);

/// Represents a positive monetary amount for a payment request.
///
/// Ensures that payment amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::InvalidArguments(format!(
                "amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn covers(&self, amount: Amount) -> bool {
        self.0 >= amount.value()
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// A named account in the ledger roster.
///
/// The token doubles as the lookup key for the account's secret in the key file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub token: String,
    pub balance: Balance,
}

impl Account {
    pub fn new(token: impl Into<String>, balance: Balance) -> Self {
        Self {
            token: token.into(),
            balance,
        }
    }

    /// Debits the account if the balance covers the amount; leaves it untouched otherwise.
    pub fn debit(&mut self, amount: Amount) -> Result<(), LedgerError> {
        if self.balance.covers(amount) {
            self.balance = self.balance - amount.into();
            Ok(())
        } else {
            Err(LedgerError::InsufficientFunds {
                token: self.token.clone(),
                balance: self.balance.0,
                requested: amount.value(),
            })
        }
    }
}
