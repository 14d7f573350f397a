//! Option validation.
//!
//! Two entry points mirror the two ways a fragment reaches a builder:
//!
//! - typed fragments ([`RuntimeOptions`], region lists) are checked by
//!   [`OptionsValidator::validate_runtime_options`] and
//!   [`OptionsValidator::validate_regions`];
//! - dynamic fragments (`serde_json::Value`, e.g. from a manifest) are parsed
//!   field by field through [`RUNTIME_OPTIONS_SCHEMA`], which catches shape
//!   errors the type system would otherwise hide (numeric strings, a
//!   non-object `retry`, and so on).
//!
//! Every check is pure and fails with [`Error::InvalidConfig`] naming the
//! field, plus the full allowed set for enumerated fields.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::options::schema::{
    DeploymentOptions, FailurePolicy, Region, RetryPolicy, RuntimeOptions, MAX_TIMEOUT_SECONDS,
    MIN_TIMEOUT_SECONDS, SUPPORTED_REGIONS, VALID_MEMORY_OPTIONS,
};

/// One field of a dynamic fragment: its key and how to check and apply it.
pub struct FieldRule<T> {
    /// Key of the field in the fragment object.
    pub field: &'static str,
    apply: fn(&Value, &mut T) -> Result<()>,
}

impl<T> FieldRule<T> {
    /// Checks `value` and, if valid, writes it into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the value is invalid for this field.
    pub fn apply(&self, value: &Value, target: &mut T) -> Result<()> {
        (self.apply)(value, target)
    }
}

/// The per-field rules making up a `run_with` fragment.
pub const RUNTIME_OPTIONS_SCHEMA: &[FieldRule<RuntimeOptions>] = &[
    FieldRule {
        field: "failurePolicy",
        apply: apply_failure_policy,
    },
    FieldRule {
        field: "memory",
        apply: apply_memory,
    },
    FieldRule {
        field: "timeoutSeconds",
        apply: apply_timeout_seconds,
    },
];

const REGIONS_FIELD: &str = "regions";

/// Validates option fragments.
///
/// # Examples
///
/// ```
/// use cloudfn::options::OptionsValidator;
/// use serde_json::json;
///
/// let options = OptionsValidator::parse_runtime_options(&json!({
///     "memory": "1GB",
///     "failurePolicy": { "retry": {} },
/// }))
/// .unwrap();
/// assert!(options.failure_policy.unwrap().retries_enabled());
///
/// let err = OptionsValidator::validate_regions(&["us-east1", "moon-1"]).unwrap_err();
/// assert_eq!(err.field(), Some("regions"));
/// ```
pub struct OptionsValidator;

impl OptionsValidator {
    /// Validates a region list and returns it as typed regions, order and
    /// duplicates preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the list is empty or holds any
    /// unsupported region. The message names every unsupported entry and
    /// the error carries the full supported set.
    pub fn validate_regions<S: AsRef<str>>(regions: &[S]) -> Result<Vec<Region>> {
        if regions.is_empty() {
            return Err(Error::invalid_choice(
                REGIONS_FIELD,
                "at least one region must be specified",
                SUPPORTED_REGIONS,
            ));
        }

        let mut unsupported: Vec<&str> = Vec::new();
        for region in regions {
            let region = region.as_ref();
            if !SUPPORTED_REGIONS.contains(&region) && !unsupported.contains(&region) {
                unsupported.push(region);
            }
        }

        if !unsupported.is_empty() {
            return Err(Error::invalid_choice(
                REGIONS_FIELD,
                format!("unsupported region(s): {}", unsupported.join(", ")),
                SUPPORTED_REGIONS,
            ));
        }

        regions.iter().map(|region| region.as_ref().parse()).collect()
    }

    /// Validates a typed runtime fragment.
    ///
    /// Only the fields present are checked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `timeout_seconds` is out of range
    /// or the failure policy carries retry settings.
    pub fn validate_runtime_options(options: &RuntimeOptions) -> Result<()> {
        if let Some(policy) = &options.failure_policy {
            Self::validate_failure_policy(policy)?;
        }

        if let Some(seconds) = options.timeout_seconds {
            if !(MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&seconds) {
                return Err(timeout_range_error(seconds));
            }
        }

        Ok(())
    }

    /// Validates a whole typed snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `regions` is present but invalid,
    /// or the runtime portion fails
    /// [`validate_runtime_options`](Self::validate_runtime_options).
    pub fn validate_deployment_options(options: &DeploymentOptions) -> Result<()> {
        if let Some(regions) = &options.regions {
            Self::validate_regions(regions)?;
        }
        Self::validate_runtime_options(&options.runtime_options())
    }

    /// Rejects structured failure policies with retry settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] on field `failurePolicy.retry` if the
    /// retry policy is not empty.
    pub fn validate_failure_policy(policy: &FailurePolicy) -> Result<()> {
        match policy {
            FailurePolicy::RetryWithPolicy(retry) if !retry.is_empty() => {
                let names: Vec<&str> = retry.setting_names().collect();
                Err(Error::invalid(
                    "failurePolicy.retry",
                    format!(
                        "must be an empty object; unsupported retry settings: {}",
                        names.join(", ")
                    ),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Parses and validates a dynamic `run_with` fragment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `value` is not an object, contains
    /// an unknown key, or any field fails its rule.
    pub fn parse_runtime_options(value: &Value) -> Result<RuntimeOptions> {
        let fields = fragment_object(value)?;
        reject_unknown_keys(fields, &[])?;
        apply_schema(fields)
    }

    /// Parses and validates a dynamic snapshot: a runtime fragment that may
    /// also carry `regions`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any field is invalid.
    pub fn parse_deployment_options(value: &Value) -> Result<DeploymentOptions> {
        let fields = fragment_object(value)?;
        reject_unknown_keys(fields, &[REGIONS_FIELD])?;

        let regions = fields.get(REGIONS_FIELD).map(Self::parse_regions).transpose()?;
        let mut options = DeploymentOptions::from(apply_schema(fields)?);
        options.regions = regions;
        Ok(options)
    }

    /// Parses a dynamic region list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `value` is not a list of strings or
    /// fails [`validate_regions`](Self::validate_regions).
    pub fn parse_regions(value: &Value) -> Result<Vec<Region>> {
        let Value::Array(items) = value else {
            return Err(Error::invalid_choice(
                REGIONS_FIELD,
                format!("must be a list of region identifiers, got {}", kind(value)),
                SUPPORTED_REGIONS,
            ));
        };

        let names = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().ok_or_else(|| {
                    Error::invalid_choice(
                        format!("{REGIONS_FIELD}[{i}]"),
                        format!("must be a string, got {}", kind(item)),
                        SUPPORTED_REGIONS,
                    )
                })
            })
            .collect::<Result<Vec<&str>>>()?;

        Self::validate_regions(&names)
    }
}

fn fragment_object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::invalid("options", format!("must be an object, got {}", kind(value))))
}

fn reject_unknown_keys(fields: &Map<String, Value>, extra: &[&str]) -> Result<()> {
    let known = |key: &str| {
        extra.contains(&key) || RUNTIME_OPTIONS_SCHEMA.iter().any(|rule| rule.field == key)
    };

    match fields.keys().find(|key| !known(key.as_str())) {
        Some(key) => Err(Error::invalid_choice(
            key.clone(),
            "unknown option",
            extra
                .iter()
                .copied()
                .chain(RUNTIME_OPTIONS_SCHEMA.iter().map(|rule| rule.field)),
        )),
        None => Ok(()),
    }
}

fn apply_schema(fields: &Map<String, Value>) -> Result<RuntimeOptions> {
    let mut options = RuntimeOptions::default();
    for rule in RUNTIME_OPTIONS_SCHEMA {
        if let Some(value) = fields.get(rule.field) {
            rule.apply(value, &mut options)?;
        }
    }
    Ok(options)
}

fn apply_failure_policy(value: &Value, target: &mut RuntimeOptions) -> Result<()> {
    let policy = match value {
        Value::Bool(retry) => FailurePolicy::from(*retry),
        Value::Object(fields) => {
            if let Some(key) = fields.keys().find(|key| key.as_str() != "retry") {
                return Err(Error::invalid_choice(
                    format!("failurePolicy.{key}"),
                    "unknown failure policy option",
                    ["retry"],
                ));
            }
            match fields.get("retry") {
                Some(Value::Object(settings)) => {
                    FailurePolicy::RetryWithPolicy(RetryPolicy::from_settings(settings.clone()))
                }
                Some(other) => {
                    return Err(Error::invalid(
                        "failurePolicy.retry",
                        format!("must be an empty object, got {}", kind(other)),
                    ))
                }
                None => {
                    return Err(Error::invalid(
                        "failurePolicy.retry",
                        "must be an empty object, but is missing",
                    ))
                }
            }
        }
        other => {
            return Err(Error::invalid(
                "failurePolicy",
                format!("must be a boolean or an object, got {}", kind(other)),
            ))
        }
    };

    OptionsValidator::validate_failure_policy(&policy)?;
    target.failure_policy = Some(policy.normalized());
    Ok(())
}

fn apply_memory(value: &Value, target: &mut RuntimeOptions) -> Result<()> {
    match value {
        Value::String(memory) => {
            target.memory = Some(memory.parse()?);
            Ok(())
        }
        other => Err(Error::invalid_choice(
            "memory",
            format!("must be a string, got {}", kind(other)),
            VALID_MEMORY_OPTIONS,
        )),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn apply_timeout_seconds(value: &Value, target: &mut RuntimeOptions) -> Result<()> {
    let number = match value {
        Value::Number(number) => number,
        Value::String(text) => {
            return Err(Error::invalid(
                "timeoutSeconds",
                format!("must be a number, not the string \"{text}\""),
            ))
        }
        // YAML `.inf` and `.nan` also arrive here as null
        Value::Null => {
            return Err(Error::invalid(
                "timeoutSeconds",
                format!(
                    "must be a finite number between {MIN_TIMEOUT_SECONDS} and {MAX_TIMEOUT_SECONDS}, got null"
                ),
            ))
        }
        other => {
            return Err(Error::invalid(
                "timeoutSeconds",
                format!("must be a number, got {}", kind(other)),
            ))
        }
    };

    let seconds = number.as_f64().unwrap_or(f64::NAN);
    let bounds = f64::from(MIN_TIMEOUT_SECONDS)..=f64::from(MAX_TIMEOUT_SECONDS);
    if !bounds.contains(&seconds) {
        return Err(timeout_range_error(number));
    }
    if seconds.fract() != 0.0 {
        return Err(Error::invalid(
            "timeoutSeconds",
            format!("must be a whole number of seconds, got {number}"),
        ));
    }

    target.timeout_seconds = Some(seconds as u32);
    Ok(())
}

fn timeout_range_error(got: impl std::fmt::Display) -> Error {
    Error::invalid(
        "timeoutSeconds",
        format!(
            "must be between {MIN_TIMEOUT_SECONDS} and {MAX_TIMEOUT_SECONDS} (inclusive), got {got}"
        ),
    )
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
