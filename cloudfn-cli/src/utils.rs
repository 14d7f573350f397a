//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across commands: locating and
//! loading the manifest, and reading environment overrides.

use crate::error::CliError;
use cloudfn::manifest::MANIFEST_FILE_NAME;
use cloudfn::options::EnvironmentConfig;
use cloudfn::{DeploymentOptions, Manifest};
use std::env;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Ignore `CLOUDFN_*` option overrides.
    pub skip_env: bool,
}

/// Resolve the manifest path, discovering `cloudfn.yaml` from the CWD if
/// not specified.
pub fn resolve_manifest_path(path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(CliError::InvalidArguments(format!(
                "File not found: {}",
                path.display()
            )));
        }
        return Ok(path);
    }

    let cwd = env::current_dir()?;
    Manifest::discover(&cwd).ok_or_else(|| {
        CliError::InvalidArguments(format!(
            "No {MANIFEST_FILE_NAME} found in {} or any parent directory",
            cwd.display()
        ))
    })
}

/// Load and parse a manifest.
///
/// Parse failures are reported as configuration errors.
pub fn load_manifest(path: Option<PathBuf>) -> Result<(PathBuf, Manifest), CliError> {
    let path = resolve_manifest_path(path)?;
    log::info!("Using manifest {}", path.display());

    match Manifest::load(&path) {
        Ok(manifest) => Ok((path, manifest)),
        Err(cloudfn::Error::Yaml(e)) => Err(CliError::Config(format!(
            "{} could not be parsed: {e}",
            path.display()
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Read option overrides from the environment, unless disabled.
pub fn load_overrides(global: &GlobalOptions) -> Result<DeploymentOptions, CliError> {
    if global.skip_env {
        log::debug!("Skipping environment overrides");
        return Ok(DeploymentOptions::default());
    }

    EnvironmentConfig::from_env().map_err(|e| CliError::Config(e.to_string()))
}
