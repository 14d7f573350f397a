//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers that isolate tests from `CLOUDFN_*` variables
//! - Manifest fixtures

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables the CLI reads; cleared on every command.
const CLOUDFN_VARS: [&str; 7] = [
    "CLOUDFN_REGIONS",
    "CLOUDFN_MEMORY",
    "CLOUDFN_TIMEOUT_SECONDS",
    "CLOUDFN_RETRY",
    "CLOUDFN_LOG_MODE",
    "CLOUDFN_SKIP_ENV",
    "CLOUDFN_OUTPUT_FORMAT",
];

/// A valid manifest with three functions.
#[allow(dead_code)]
pub const VALID_MANIFEST: &str = r"
defaults:
  regions: [europe-west1]
  memory: 256MB
functions:
  - name: api
    options:
      failurePolicy: true
    trigger:
      https: on_request
  - name: thumbnails
    options:
      memory: 1GB
      timeoutSeconds: 300
    trigger:
      storage: object
  - name: nightly
    trigger:
      pubsub:
        schedule: every 24 hours
";

/// Test environment with an isolated working directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a command builder running in the temp directory with every
    /// `CLOUDFN_*` variable removed.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cloudfn").expect("Failed to find cloudfn binary");
        cmd.current_dir(&self.temp_path);
        for var in CLOUDFN_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file under the temp directory and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }
}
