#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Scratch working directory so no stray `.tt.toml` is picked up.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(".tt.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// `tt` with a clean environment, run inside this directory.
    pub fn tt(&self) -> Command {
        let mut cmd = Command::cargo_bin("tt").expect("binary");
        cmd.current_dir(self.dir.path())
            .env_remove("TT_USER")
            .env_remove("TT_PASSWORD")
            .env_remove("TT_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `tt --user <user> --password <password>`.
    pub fn tt_as(&self, user: &str, password: &str) -> Command {
        let mut cmd = self.tt();
        cmd.args(["--user", user, "--password", password]);
        cmd
    }
}

pub fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is a json envelope")
}
