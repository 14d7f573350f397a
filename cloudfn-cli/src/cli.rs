//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CompletionsCommand, DescribeCommand, OptionsCommand, ValidateCommand};
use clap::{Parser, Subcommand};

/// Command-line tool for validating cloud function manifests.
#[derive(Parser)]
#[command(name = "cloudfn")]
#[command(
    version,
    about = "Validate and describe cloud function deployment manifests",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Ignore CLOUDFN_* option overrides from the environment
    #[arg(long, global = true, env = "CLOUDFN_SKIP_ENV")]
    pub skip_env: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Validate a manifest
    Validate(ValidateCommand),

    /// Print the resolved function descriptors of a manifest
    Describe(DescribeCommand),

    /// List supported regions, memory tiers, and timeout bounds
    Options(OptionsCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
