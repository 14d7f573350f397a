//! Error types for the cloudfn library.
//!
//! Every validation failure is reported as [`Error::InvalidConfig`], raised at
//! the point of validation. The remaining variants cover manifest I/O and
//! parsing.

use std::fmt;

use thiserror::Error;

/// Result type alias for operations that may fail with a cloudfn error.
///
/// # Examples
///
/// ```
/// use cloudfn::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(60)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the cloudfn library.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration fragment failed validation.
    #[error("invalid configuration for '{field}': {reason}{}", AllowedValues(.allowed))]
    InvalidConfig {
        /// Path of the offending field (e.g. `memory`, `failurePolicy.retry`).
        field: String,
        /// A description of the failure.
        reason: String,
        /// The complete allowed set for enumerated fields, empty otherwise.
        allowed: Vec<String>,
    },

    /// A manifest could not be parsed.
    #[error("manifest parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value could not be converted to or from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },
}

/// Formats the allowed-set suffix of an [`Error::InvalidConfig`] message.
struct AllowedValues<'a>(&'a [String]);

impl fmt::Display for AllowedValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            write!(f, " (allowed values: {})", self.0.join(", "))
        }
    }
}

impl Error {
    /// Builds an [`Error::InvalidConfig`] for a field without an enumerated
    /// allowed set.
    ///
    /// # Examples
    ///
    /// ```
    /// use cloudfn::Error;
    ///
    /// let err = Error::invalid("timeoutSeconds", "must be a number");
    /// assert!(err.is_invalid_config());
    /// assert_eq!(err.field(), Some("timeoutSeconds"));
    /// ```
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
            allowed: Vec::new(),
        }
    }

    /// Builds an [`Error::InvalidConfig`] that lists the full allowed set.
    pub fn invalid_choice<I, S>(
        field: impl Into<String>,
        reason: impl Into<String>,
        allowed: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Prefixes the field path of a validation failure with `context`.
    ///
    /// Other errors are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use cloudfn::Error;
    ///
    /// let err = Error::invalid("memory", "bad").in_context("functions[2].options");
    /// assert_eq!(err.field(), Some("functions[2].options.memory"));
    /// ```
    #[must_use]
    pub fn in_context(self, context: &str) -> Self {
        match self {
            Self::InvalidConfig {
                field,
                reason,
                allowed,
            } => Self::InvalidConfig {
                field: format!("{context}.{field}"),
                reason,
                allowed,
            },
            other => other,
        }
    }

    /// Check if error is a configuration validation failure.
    #[must_use]
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// Returns the offending field path for validation failures.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidConfig { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    /// Returns the allowed set reported with a validation failure.
    #[must_use]
    pub fn allowed(&self) -> &[String] {
        match self {
            Self::InvalidConfig { allowed, .. } => allowed.as_slice(),
            _ => &[],
        }
    }
}
