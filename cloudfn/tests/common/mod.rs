//! Common test utilities for integration tests.
//!
//! This module provides helpers for writing manifests to disk and guarding
//! process environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// A small manifest exercising defaults, per-function options, and three
/// trigger families.
#[allow(dead_code)]
pub const SAMPLE_MANIFEST: &str = r"
defaults:
  regions: [us-east1]
  memory: 256MB
functions:
  - name: api
    trigger:
      https: on_call
  - name: resize
    options:
      memory: 1GB
      timeoutSeconds: 120
    trigger:
      storage:
        bucket: uploads
  - name: audit
    options:
      failurePolicy:
        retry: {}
    trigger:
      firestore:
        document: orders/{orderId}
";

/// Writes `content` to `dir/filename` and returns the path.
#[allow(dead_code)]
pub fn write_manifest(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

/// RAII guard for setting and restoring environment variables.
///
/// Tests using it must be `#[serial]`: environment variables are
/// process-global.
#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    /// Sets `key` to `value` until the guard drops.
    pub fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }

    /// Removes `key` until the guard drops.
    pub fn remove(key: &str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(value) => env::set_var(&self.key, value),
            None => env::remove_var(&self.key),
        }
    }
}
