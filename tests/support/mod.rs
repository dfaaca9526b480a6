#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const YEAR: i32 = 2026;

/// Isolated home directory with an explicit config pointing into it
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        fs::create_dir_all(dir.path().join("home")).expect("home dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.root().join(YEAR.to_string())
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn write_config(&self) -> std::io::Result<PathBuf> {
        let path = self.config_path();
        let contents = format!(
            "root = \"{}\"\nyear = {YEAR}\n",
            self.root().display()
        );
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn task_file(&self, name: &str) -> PathBuf {
        self.store_dir().join(format!("{name}.csv"))
    }

    pub fn read_task_file(&self, name: &str) -> std::io::Result<String> {
        fs::read_to_string(self.task_file(name))
    }

    /// Binary with HOME pointed at the sandbox and no config override
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tenthousand").expect("binary");
        cmd.env("HOME", self.home());
        cmd.env_remove("TENTHOUSAND_CONFIG");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Binary using the sandbox config file
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--config").arg(self.config_path());
        cmd
    }
}
