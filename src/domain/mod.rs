//! Domain layer: value objects, the account ledger, payment history and the
//! ports the application layer talks to.

pub mod account;
pub mod history;
pub mod ledger;
pub mod payment;
pub mod ports;
pub mod snapshot;
