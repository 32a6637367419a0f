use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    #[allow(dead_code)]
    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(".taskdeck.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// A command rooted in this workspace with its data dir preconfigured.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskdeck").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd.env("TASKDECK_DATA_DIR", self.data_dir());
        cmd
    }
}

/// Run a command with `--json`, assert success, and return the envelope's
/// `data` payload.
#[allow(dead_code)]
pub fn json_data(ws: &TestWorkspace, args: &[&str]) -> serde_json::Value {
    let output = ws
        .cmd()
        .args(args)
        .arg("--json")
        .output()
        .expect("run taskdeck");
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    let envelope: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("parse JSON envelope");
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["schema_version"], "taskdeck.v1");
    envelope["data"].clone()
}
