use super::account::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A request to settle `amount` for an order. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentRequest {
    pub order_num: i64,
    pub amount: Amount,
}

impl PaymentRequest {
    pub fn new(order_num: i64, amount: Amount) -> Self {
        Self { order_num, amount }
    }
}

/// A settled payment: which account paid, with which key, and how much.
///
/// Records are immutable once created and are kept in settlement order;
/// `order_num` is not required to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub order_num: i64,
    pub token: String,
    pub key: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
}

impl PaymentRecord {
    pub fn new(
        order_num: i64,
        token: impl Into<String>,
        key: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            order_num,
            token: token.into(),
            key: key.into(),
            amount: amount.value(),
        }
    }
}
