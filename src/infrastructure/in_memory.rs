use crate::domain::ports::{KeyResolver, StateStore};
use crate::domain::snapshot::{AbsentReason, LedgerSnapshot, LoadOutcome};
use crate::error::{KeyError, PersistenceError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A shareable in-memory snapshot store.
///
/// Clones share the same slot, which makes it handy for simulating several
/// invocations against one "file". Can be switched to refuse writes.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStateStore {
    snapshot: Arc<RwLock<Option<LedgerSnapshot>>>,
    reject_writes: bool,
}

impl InMemoryStateStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(snapshot))),
            reject_writes: false,
        }
    }

    /// A store whose every `save` fails, sharing this store's contents.
    pub fn read_only(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            reject_writes: true,
        }
    }

    pub fn current(&self) -> Option<LedgerSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self) -> LoadOutcome {
        match self.current() {
            Some(snapshot) => LoadOutcome::Loaded(snapshot),
            None => LoadOutcome::Absent(AbsentReason::Missing),
        }
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), PersistenceError> {
        if self.reject_writes {
            return Err(PersistenceError::Write {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "store is read-only",
                ),
            });
        }
        *self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(snapshot.clone());
        Ok(())
    }
}

/// Resolves keys from a fixed table, ignoring the file path.
#[derive(Debug, Default, Clone)]
pub struct StaticKeyResolver {
    keys: HashMap<String, String>,
}

impl StaticKeyResolver {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            keys: pairs
                .into_iter()
                .map(|(token, key)| (token.to_string(), key.to_string()))
                .collect(),
        }
    }
}

impl KeyResolver for StaticKeyResolver {
    fn retrieve(&self, filepath: &Path, key: &str) -> Result<String, KeyError> {
        self.keys.get(key).cloned().ok_or_else(|| KeyError::MissingKey {
            key: key.to_string(),
            path: filepath.to_path_buf(),
        })
    }
}
