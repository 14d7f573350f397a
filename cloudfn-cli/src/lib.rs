//! Library exports for cloudfn-cli.
//!
//! This module exports the CLI structure and commands for the binary and
//! for documentation tooling.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
