//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `validate`: Validate a manifest
//! - `describe`: Print resolved function descriptors
//! - `options`: List supported option values
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod describe;
pub mod options;
pub mod validate;

pub use completions::CompletionsCommand;
pub use describe::DescribeCommand;
pub use options::OptionsCommand;
pub use validate::ValidateCommand;
