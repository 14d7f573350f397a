//! Describe command implementation.
//!
//! This module implements the `describe` command, which resolves a manifest
//! and prints each function's trigger and effective options.

use crate::error::CliError;
use crate::utils::{load_manifest, load_overrides, GlobalOptions};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

/// Print the resolved function descriptors of a manifest.
#[derive(Args)]
pub struct DescribeCommand {
    /// Manifest to describe (default: nearest cloudfn.yaml)
    #[arg(value_name = "MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "json",
        env = "CLOUDFN_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,

    /// Only describe the named function
    #[arg(long, value_name = "NAME")]
    pub function: Option<String>,
}

/// Output format for the describe command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

impl DescribeCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (_, manifest) = load_manifest(self.manifest)?;
        let overrides = load_overrides(global)?;

        let functions = manifest.resolve(&overrides)?;
        let output = match &self.function {
            Some(name) => {
                let index = manifest.index_of(name)?;
                render(&functions[index], self.format)?
            }
            None => render(&functions, self.format)?,
        };

        print!("{output}");
        Ok(())
    }
}

fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}
