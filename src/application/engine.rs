use super::router::PaymentRouter;
use crate::config::LedgerConfig;
use crate::domain::payment::{PaymentRecord, PaymentRequest};
use crate::domain::ports::{KeyResolverRef, StateStoreBox};
use crate::domain::snapshot::{AbsentReason, LoadOutcome};
use crate::error::{PersistenceError, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// What a successful payment produced.
///
/// `persist_error` is set when the debit succeeded but the snapshot could not
/// be written back; the payment still counts as settled.
#[derive(Debug)]
pub struct PaymentReceipt {
    pub record: PaymentRecord,
    pub persist_error: Option<PersistenceError>,
}

impl PaymentReceipt {
    pub fn is_durable(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// The entry point for one invocation.
///
/// `PaymentEngine` loads the stored snapshot (or starts from the configured
/// defaults), settles at most one payment or lists the history, and writes the
/// snapshot back after each successful payment.
pub struct PaymentEngine {
    router: PaymentRouter,
    store: StateStoreBox,
}

impl PaymentEngine {
    /// Opens the ledger described by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Roster, default balances and routing policy.
    /// * `store` - Where snapshots are loaded from and saved to.
    /// * `resolver` - Shared key resolver used for every settled payment.
    /// * `key_file` - The token/key lookup file handed to the resolver.
    pub fn open(
        config: &LedgerConfig,
        store: StateStoreBox,
        resolver: KeyResolverRef,
        key_file: impl Into<PathBuf>,
    ) -> Result<Self> {
        config.validate()?;

        let snapshot = match store.load() {
            LoadOutcome::Loaded(snapshot) => Some(snapshot),
            LoadOutcome::Absent(AbsentReason::Missing) => {
                info!("starting a fresh ledger");
                None
            }
            LoadOutcome::Absent(reason) => {
                warn!(?reason, "discarding unusable state, starting a fresh ledger");
                None
            }
        };

        let router = PaymentRouter::from_snapshot(config, snapshot, resolver, key_file)?;
        Ok(Self { router, store })
    }

    /// Settles one payment and persists the result.
    ///
    /// Routing and key errors abort before anything is saved. A failed write
    /// is reported on the receipt, not as an error.
    pub fn pay(&mut self, request: PaymentRequest) -> Result<PaymentReceipt> {
        let record = self.router.route(request)?;
        info!(order_num = record.order_num, token = %record.token, "payment settled");

        let persist_error = self.store.save(&self.router.snapshot()).err();
        if let Some(e) = &persist_error {
            warn!(error = %e, "payment settled but state was not saved");
        }

        Ok(PaymentReceipt {
            record,
            persist_error,
        })
    }

    /// Settled payments in chronological order.
    pub fn payments(&self) -> impl Iterator<Item = &PaymentRecord> {
        self.router.records()
    }

    pub fn router(&self) -> &PaymentRouter {
        &self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Amount, Balance};
    use crate::domain::snapshot::LedgerSnapshot;
    use crate::error::{PaymentError, RoutingError};
    use crate::infrastructure::in_memory::{InMemoryStateStore, StaticKeyResolver};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn resolver() -> KeyResolverRef {
        Arc::new(StaticKeyResolver::from_pairs([("token1", "key1"), ("token2", "key2")]))
    }

    fn request(order_num: i64, value: rust_decimal::Decimal) -> PaymentRequest {
        PaymentRequest::new(order_num, Amount::new(value).unwrap())
    }

    #[test]
    fn test_payment_is_persisted() {
        let store = InMemoryStateStore::new();
        let mut engine = PaymentEngine::open(
            &LedgerConfig::default(),
            Box::new(store.clone()),
            resolver(),
            "keys.json",
        )
        .unwrap();

        let receipt = engine.pay(request(1, dec!(500))).unwrap();
        assert!(receipt.is_durable());
        assert_eq!(receipt.record.key, "key1");

        let saved = store.current().unwrap();
        assert_eq!(saved.balances["token1"], Balance::new(dec!(500)));
        assert_eq!(saved.balances["token2"], Balance::new(dec!(2000)));
        assert_eq!(saved.history, vec![receipt.record]);
    }

    #[test]
    fn test_state_carries_across_invocations() {
        let store = InMemoryStateStore::new();
        let config = LedgerConfig::default();

        for (order, value) in [(1, dec!(500)), (2, dec!(500)), (3, dec!(600))] {
            let mut engine = PaymentEngine::open(
                &config,
                Box::new(store.clone()),
                resolver(),
                "keys.json",
            )
            .unwrap();
            engine.pay(request(order, value)).unwrap();
        }

        let mut engine =
            PaymentEngine::open(&config, Box::new(store.clone()), resolver(), "keys.json").unwrap();
        let before = store.current();
        let result = engine.pay(request(4, dec!(1000)));
        assert!(matches!(
            result,
            Err(PaymentError::Routing(RoutingError::InsufficientFunds { .. }))
        ));
        assert_eq!(store.current(), before);

        let listed: Vec<(i64, String)> = engine
            .payments()
            .map(|r| (r.order_num, r.token.clone()))
            .collect();
        assert_eq!(
            listed,
            vec![
                (1, "token1".to_string()),
                (2, "token2".to_string()),
                (3, "token2".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let store = InMemoryStateStore::new();
        let mut engine = PaymentEngine::open(
            &LedgerConfig::default(),
            Box::new(store.read_only()),
            resolver(),
            "keys.json",
        )
        .unwrap();

        let receipt = engine.pay(request(1, dec!(100))).unwrap();
        assert!(!receipt.is_durable());
        assert_eq!(
            engine.router().ledger().get_balance("token1").unwrap(),
            Balance::new(dec!(900))
        );
        assert!(store.current().is_none());
    }

    #[test]
    fn test_key_failure_saves_nothing() {
        let store = InMemoryStateStore::new();
        let mut engine = PaymentEngine::open(
            &LedgerConfig::default(),
            Box::new(store.clone()),
            Arc::new(StaticKeyResolver::default()),
            "keys.json",
        )
        .unwrap();

        let result = engine.pay(request(1, dec!(100)));
        assert!(matches!(
            result,
            Err(PaymentError::Routing(RoutingError::KeyResolution { .. }))
        ));
        assert!(store.current().is_none());
    }

    #[test]
    fn test_listing_does_not_mutate() {
        let mut snapshot = LedgerSnapshot::default();
        snapshot.balances.insert("token1".into(), Balance::new(dec!(1)));
        snapshot.balances.insert("token2".into(), Balance::new(dec!(2)));
        let store = InMemoryStateStore::with_snapshot(snapshot.clone());

        let engine = PaymentEngine::open(
            &LedgerConfig::default(),
            Box::new(store.clone()),
            resolver(),
            "keys.json",
        )
        .unwrap();
        assert_eq!(engine.payments().count(), 0);
        assert_eq!(engine.payments().count(), 0);
        assert_eq!(engine.router().next_index(), 0);
        assert_eq!(store.current(), Some(snapshot));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = LedgerConfig {
            accounts: vec![],
            ..LedgerConfig::default()
        };
        let result = PaymentEngine::open(
            &config,
            Box::new(InMemoryStateStore::new()),
            resolver(),
            "keys.json",
        );
        assert!(matches!(result, Err(PaymentError::Config(_))));
    }
}
