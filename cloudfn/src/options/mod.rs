//! Deployment options for cloudfn functions.
//!
//! This module provides the option snapshot carried by a builder and the
//! rules around it:
//! - closed value sets for regions and memory, and timeout bounds
//! - validation of typed and dynamic fragments
//! - field-wise merging of fragments into a snapshot
//! - `CLOUDFN_*` environment variable overrides
//!
//! # Examples
//!
//! ```
//! use cloudfn::{DeploymentOptions, Memory, Region, RuntimeOptions};
//!
//! let snapshot = DeploymentOptions::default()
//!     .with_regions(&["us-east1"])
//!     .unwrap()
//!     .with_runtime_options(&RuntimeOptions {
//!         memory: Some(Memory::Gb1),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! assert_eq!(snapshot.regions, Some(vec![Region::UsEast1]));
//! assert_eq!(snapshot.memory, Some(Memory::Gb1));
//! ```

pub mod environment;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use environment::EnvironmentConfig;
pub use merger::OptionsMerger;
pub use schema::{
    DeploymentOptions, FailurePolicy, Memory, Region, RetryPolicy, RuntimeOptions,
    DEFAULT_REGION, MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS, SUPPORTED_REGIONS,
    VALID_MEMORY_OPTIONS,
};
pub use validator::{FieldRule, OptionsValidator, RUNTIME_OPTIONS_SCHEMA};
