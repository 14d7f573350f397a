#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # cloudfn
//!
//! A library for declaring validated deployment options for event-triggered
//! cloud functions.
//!
//! Options (regions, memory, timeout, failure policy) are validated as they
//! are set on a [`FunctionBuilder`], merged field by field, and handed to a
//! trigger-family factory when the function is bound to an event source.
//!
//! ## Core Types
//!
//! - [`DeploymentOptions`] and [`RuntimeOptions`]: option snapshots and fragments
//! - [`FunctionBuilder`]: the chainable builder, started with [`region`],
//!   [`run_with`], or [`run_with_value`]
//! - [`triggers`]: per-family factory traits and the built-in [`DescriptorFactory`]
//! - [`Manifest`]: functions declared in a `cloudfn.yaml` file
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use cloudfn::{Memory, RuntimeOptions};
//!
//! let descriptor = cloudfn::region(&["us-east1"])
//!     .unwrap()
//!     .run_with(RuntimeOptions {
//!         memory: Some(Memory::Mb512),
//!         timeout_seconds: Some(120),
//!         ..Default::default()
//!     })
//!     .unwrap()
//!     .storage()
//!     .object();
//!
//! assert_eq!(descriptor.options.timeout_seconds, Some(120));
//!
//! // Invalid fragments fail where they are set
//! assert!(cloudfn::run_with_value(&serde_json::json!({ "memory": "3GB" })).is_err());
//! ```

pub mod builder;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod options;
pub mod triggers;

// Re-export key types at crate root for convenience
pub use builder::{region, run_with, run_with_value, FunctionBuilder};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use manifest::{FunctionSpec, Manifest, ResolvedFunction, TriggerSpec};
pub use options::{
    DeploymentOptions, FailurePolicy, Memory, Region, RetryPolicy, RuntimeOptions,
    MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS, SUPPORTED_REGIONS, VALID_MEMORY_OPTIONS,
};
pub use triggers::{DescriptorFactory, TriggerDescriptor};
