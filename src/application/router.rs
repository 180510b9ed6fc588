use crate::config::{LedgerConfig, RoutingPolicy};
use crate::domain::account::{Account, Amount, Balance};
use crate::domain::history::PaymentHistory;
use crate::domain::ledger::AccountLedger;
use crate::domain::payment::{PaymentRecord, PaymentRequest};
use crate::domain::ports::KeyResolverRef;
use crate::domain::snapshot::LedgerSnapshot;
use crate::error::{LedgerError, PaymentError, Result, RoutingError};
use std::path::PathBuf;
use tracing::debug;

/// Outcome of the account selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Roster index to debit, or `None` when no candidate covers the amount.
    pub chosen: Option<usize>,
    /// Where the cursor points once the payment is settled (or refused).
    pub next_cursor: usize,
}

/// Picks the account to debit, starting at `cursor`.
///
/// The cursor account gets first refusal. If it pays, the cursor moves to its
/// successor. If a later candidate pays, the cursor snaps back to the account
/// that was tried first. If nobody can pay, the cursor still advances by one.
pub fn select_account(
    ledger: &AccountLedger,
    cursor: usize,
    amount: Amount,
    policy: RoutingPolicy,
) -> Selection {
    let n = ledger.len();
    if n == 0 {
        return Selection {
            chosen: None,
            next_cursor: 0,
        };
    }
    let primary = cursor % n;
    let secondary = (primary + 1) % n;
    let candidates = match policy {
        RoutingPolicy::TwoCandidate => 2,
        RoutingPolicy::FullRotation => n,
    };

    for offset in 0..candidates {
        let index = (primary + offset) % n;
        let covers = ledger
            .account_at(index)
            .is_some_and(|account| account.balance.covers(amount));
        if covers {
            let next_cursor = if offset == 0 { secondary } else { primary };
            return Selection {
                chosen: Some(index),
                next_cursor,
            };
        }
    }

    Selection {
        chosen: None,
        next_cursor: secondary,
    }
}

/// Settles payment requests against the account roster.
///
/// Owns the ledger, the history and the rotating cursor. The key resolver is
/// shared and injected at construction.
pub struct PaymentRouter {
    ledger: AccountLedger,
    history: PaymentHistory,
    next_index: usize,
    policy: RoutingPolicy,
    resolver: KeyResolverRef,
    key_file: PathBuf,
}

impl PaymentRouter {
    /// Creates a router whose cursor resumes at `history.len() mod N`.
    pub fn new(
        ledger: AccountLedger,
        history: PaymentHistory,
        policy: RoutingPolicy,
        resolver: KeyResolverRef,
        key_file: impl Into<PathBuf>,
    ) -> Result<Self> {
        if ledger.is_empty() {
            return Err(PaymentError::Config("the account roster is empty".into()));
        }
        let next_index = history.len() % ledger.len();
        Ok(Self {
            ledger,
            history,
            next_index,
            policy,
            resolver,
            key_file: key_file.into(),
        })
    }

    /// Rebuilds the router from a stored snapshot, or from the configured
    /// defaults when there is none.
    ///
    /// The roster always comes from `config`: stored balances are matched by
    /// token, unknown stored tokens are dropped and configured tokens missing
    /// from the snapshot start at zero.
    pub fn from_snapshot(
        config: &LedgerConfig,
        snapshot: Option<LedgerSnapshot>,
        resolver: KeyResolverRef,
        key_file: impl Into<PathBuf>,
    ) -> Result<Self> {
        let (accounts, history) = match snapshot {
            Some(snapshot) => {
                let accounts = config
                    .accounts
                    .iter()
                    .map(|spec| {
                        let balance = snapshot
                            .balances
                            .get(&spec.token)
                            .copied()
                            .unwrap_or(Balance::ZERO);
                        Account::new(spec.token.clone(), balance)
                    })
                    .collect();
                (accounts, PaymentHistory::from(snapshot.history))
            }
            None => (config.default_accounts(), PaymentHistory::new()),
        };

        Self::new(
            AccountLedger::new(accounts),
            history,
            config.policy,
            resolver,
            key_file,
        )
    }

    /// Settles one request.
    ///
    /// The debit is applied before the key is resolved; if resolution fails
    /// the debit stays applied in memory and no record is appended.
    pub fn route(
        &mut self,
        request: PaymentRequest,
    ) -> std::result::Result<PaymentRecord, RoutingError> {
        let selection =
            select_account(&self.ledger, self.next_index, request.amount, self.policy);
        debug!(
            order_num = request.order_num,
            amount = %request.amount,
            cursor = self.next_index,
            chosen = ?selection.chosen,
            next_cursor = selection.next_cursor,
            "routing payment"
        );

        let Some(index) = selection.chosen else {
            self.next_index = selection.next_cursor;
            return Err(RoutingError::InsufficientFunds {
                order_num: request.order_num,
                amount: request.amount.value(),
            });
        };

        let token = self
            .ledger
            .account_at(index)
            .map(|account| account.token.clone())
            .ok_or_else(|| LedgerError::UnknownAccount(format!("#{index}")))?;
        self.ledger.debit(&token, request.amount)?;

        let key = self
            .resolver
            .retrieve(&self.key_file, &token)
            .map_err(|source| RoutingError::KeyResolution {
                token: token.clone(),
                source,
            })?;

        let record = PaymentRecord::new(request.order_num, token, key, request.amount);
        self.history.append(record.clone());
        self.next_index = selection.next_cursor;
        Ok(record)
    }

    /// Chronological view of settled payments. Never mutates anything.
    pub fn records(&self) -> impl Iterator<Item = &PaymentRecord> {
        self.history.iter()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balances: self
                .ledger
                .accounts()
                .iter()
                .map(|account| (account.token.clone(), account.balance))
                .collect(),
            history: self.history.clone().into(),
        }
    }

    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    pub fn history(&self) -> &PaymentHistory {
        &self.history
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }
}
