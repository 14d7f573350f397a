//! Environment variable handling for option overrides.
//!
//! This module reads `CLOUDFN_*` variables into an options fragment. Values
//! pass through the same validators as any other fragment; a failure names
//! the offending variable.

use std::env;

use crate::error::{Error, Result};
use crate::options::schema::{DeploymentOptions, FailurePolicy, RuntimeOptions};
use crate::options::validator::OptionsValidator;

/// Comma-separated region list.
pub const REGIONS_VAR: &str = "CLOUDFN_REGIONS";
/// Memory tier literal.
pub const MEMORY_VAR: &str = "CLOUDFN_MEMORY";
/// Timeout in whole seconds.
pub const TIMEOUT_VAR: &str = "CLOUDFN_TIMEOUT_SECONDS";
/// Boolean shorthand for the failure policy.
pub const RETRY_VAR: &str = "CLOUDFN_RETRY";

/// Handles environment variable overrides for deployment options.
///
/// # Examples
///
/// ```no_run
/// use cloudfn::options::EnvironmentConfig;
/// use cloudfn::DeploymentOptions;
///
/// let mut options = DeploymentOptions::default();
/// EnvironmentConfig::apply_overrides(&mut options).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Reads the override fragment from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an invalid value.
    pub fn from_env() -> Result<DeploymentOptions> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Applies process environment overrides on top of `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an invalid value; `options` is
    /// left unchanged in that case.
    pub fn apply_overrides(options: &mut DeploymentOptions) -> Result<()> {
        let overrides = Self::from_env()?;
        *options = options.merged(&overrides);
        Ok(())
    }

    /// Reads the override fragment through `lookup`.
    ///
    /// Unset and empty variables are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<DeploymentOptions>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut fragment = DeploymentOptions::default();

        if let Some(value) = read(REGIONS_VAR) {
            let regions: Vec<&str> = value.split(',').map(str::trim).collect();
            fragment.regions = Some(
                OptionsValidator::validate_regions(&regions)
                    .map_err(|err| attribute(REGIONS_VAR, err))?,
            );
        }

        let mut runtime = RuntimeOptions::default();

        if let Some(value) = read(MEMORY_VAR) {
            runtime.memory = Some(
                value
                    .trim()
                    .parse()
                    .map_err(|err| attribute(MEMORY_VAR, err))?,
            );
        }

        if let Some(value) = read(TIMEOUT_VAR) {
            let seconds = value.trim().parse().map_err(|_| {
                Error::invalid(
                    TIMEOUT_VAR,
                    format!("must be a whole number of seconds, got '{value}'"),
                )
            })?;
            OptionsValidator::validate_runtime_options(&RuntimeOptions {
                timeout_seconds: Some(seconds),
                ..Default::default()
            })
            .map_err(|err| attribute(TIMEOUT_VAR, err))?;
            runtime.timeout_seconds = Some(seconds);
        }

        if let Some(value) = read(RETRY_VAR) {
            let policy = FailurePolicy::from(Self::parse_bool(RETRY_VAR, &value)?);
            OptionsValidator::validate_failure_policy(&policy)
                .map_err(|err| attribute(RETRY_VAR, err))?;
            runtime.failure_policy = Some(policy);
        }

        Ok(fragment.merged(&DeploymentOptions::from(runtime)))
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::invalid(
                field,
                format!("Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"),
            )),
        }
    }
}

/// Re-labels a validation failure with the variable it came from.
fn attribute(variable: &str, err: Error) -> Error {
    match err {
        Error::InvalidConfig {
            reason, allowed, ..
        } => Error::InvalidConfig {
            field: variable.into(),
            reason,
            allowed,
        },
        other => other,
    }
}
