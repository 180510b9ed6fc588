//! Application layer containing the settlement logic.
//!
//! `PaymentRouter` decides which account pays for a request and keeps the
//! rotating cursor; `PaymentEngine` wraps it with loading and saving of the
//! ledger snapshot for a single invocation.

pub mod engine;
pub mod router;
