use crate::domain::ports::{KeyResolver, StateStore};
use crate::domain::snapshot::{AbsentReason, LedgerSnapshot, LoadOutcome};
use crate::error::{KeyError, PersistenceError};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Looks up token secrets in a flat JSON object (`{"token1": "secret", ...}`).
///
/// Stateless: the file is read on every lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonKeyResolver;

impl JsonKeyResolver {
    pub fn new() -> Self {
        Self
    }
}

impl KeyResolver for JsonKeyResolver {
    fn retrieve(&self, filepath: &Path, key: &str) -> Result<String, KeyError> {
        if !filepath.is_file() {
            return Err(KeyError::FileNotFound(filepath.to_path_buf()));
        }
        let invalid = |reason: String| KeyError::InvalidFormat {
            path: filepath.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(filepath).map_err(|e| invalid(e.to_string()))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        let map = value
            .as_object()
            .ok_or_else(|| invalid("expected a JSON object".to_string()))?;

        match map.get(key) {
            Some(Value::String(secret)) => Ok(secret.clone()),
            Some(other) => Err(invalid(format!(
                "value for '{key}' is not a string: {other}"
            ))),
            None => Err(KeyError::MissingKey {
                key: key.to_string(),
                path: filepath.to_path_buf(),
            }),
        }
    }
}

/// Persists the ledger snapshot as a pretty-printed JSON file.
///
/// Writes overwrite the file in place; there is no write-then-rename and no
/// locking, so concurrent invocations on the same file can lose updates.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved state, using defaults");
                return LoadOutcome::Absent(AbsentReason::Missing);
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file unreadable, using defaults"
                );
                return LoadOutcome::Absent(AbsentReason::Unreadable(e.to_string()));
            }
        };

        let snapshot = serde_json::from_str::<LedgerSnapshot>(&content)
            .map_err(|e| e.to_string())
            .and_then(|snapshot| snapshot.validate().map(|_| snapshot));

        match snapshot {
            Ok(snapshot) => LoadOutcome::Loaded(snapshot),
            Err(reason) => {
                warn!(path = %self.path.display(), %reason, "state file malformed, using defaults");
                LoadOutcome::Absent(AbsentReason::Malformed(reason))
            }
        }
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json).map_err(|source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
