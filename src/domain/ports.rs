use super::snapshot::{LedgerSnapshot, LoadOutcome};
use crate::error::{KeyError, PersistenceError};
use std::path::Path;
use std::sync::Arc;

/// Resolves the secret associated with a token from a read-only lookup file.
pub trait KeyResolver: Send + Sync {
    fn retrieve(&self, filepath: &Path, key: &str) -> Result<String, KeyError>;
}

/// Durable storage for ledger snapshots.
///
/// There is no locking: two processes writing the same store can lose updates.
pub trait StateStore: Send + Sync {
    fn load(&self) -> LoadOutcome;
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), PersistenceError>;
}

pub type KeyResolverRef = Arc<dyn KeyResolver>;
pub type StateStoreBox = Box<dyn StateStore>;
