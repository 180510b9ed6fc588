use assert_cmd::cargo_bin;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A scratch working directory holding a key file, with the binary run inside it.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("keys.json"),
            r#"{"token1": "key1", "token2": "key2", "token3": "key3"}"#,
        )
        .unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_file(&self) -> PathBuf {
        self.path().join("payment_state.json")
    }

    /// The binary with `keys.json` as its positional argument.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin!("payment-router"));
        cmd.current_dir(self.path())
            .env_remove("PAYMENT_STATE_FILE")
            .env_remove("RUST_LOG")
            .arg("keys.json");
        cmd
    }

    pub fn state(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.state_file()).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}
