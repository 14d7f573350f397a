//! Deployment option types.
//!
//! This module defines the snapshot held by a builder ([`DeploymentOptions`]),
//! the fragment accepted by `run_with` ([`RuntimeOptions`]), and the closed
//! value sets they draw from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::options::merger::OptionsMerger;
use crate::options::validator::OptionsValidator;

/// Lower bound (inclusive) for `timeoutSeconds`.
pub const MIN_TIMEOUT_SECONDS: u32 = 0;

/// Upper bound (inclusive) for `timeoutSeconds`.
pub const MAX_TIMEOUT_SECONDS: u32 = 540;

/// Region used by deployment tooling when no region has been set.
pub const DEFAULT_REGION: Region = Region::UsCentral1;

/// Every supported region identifier, in declaration order.
pub const SUPPORTED_REGIONS: [&str; 8] = [
    "us-central1",
    "us-east1",
    "us-east4",
    "europe-west1",
    "europe-west2",
    "europe-west3",
    "asia-east2",
    "asia-northeast1",
];

/// Every valid memory allocation, smallest first.
pub const VALID_MEMORY_OPTIONS: [&str; 5] = ["128MB", "256MB", "512MB", "1GB", "2GB"];

/// A region a function can be deployed to.
///
/// # Examples
///
/// ```
/// use cloudfn::Region;
///
/// let region: Region = "europe-west1".parse().unwrap();
/// assert_eq!(region, Region::EuropeWest1);
/// assert_eq!(region.as_str(), "europe-west1");
/// assert!("mars-north1".parse::<Region>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    /// `us-central1`
    #[serde(rename = "us-central1")]
    UsCentral1,
    /// `us-east1`
    #[serde(rename = "us-east1")]
    UsEast1,
    /// `us-east4`
    #[serde(rename = "us-east4")]
    UsEast4,
    /// `europe-west1`
    #[serde(rename = "europe-west1")]
    EuropeWest1,
    /// `europe-west2`
    #[serde(rename = "europe-west2")]
    EuropeWest2,
    /// `europe-west3`
    #[serde(rename = "europe-west3")]
    EuropeWest3,
    /// `asia-east2`
    #[serde(rename = "asia-east2")]
    AsiaEast2,
    /// `asia-northeast1`
    #[serde(rename = "asia-northeast1")]
    AsiaNortheast1,
}

impl Region {
    /// All supported regions, in the same order as [`SUPPORTED_REGIONS`].
    pub const ALL: [Region; 8] = [
        Region::UsCentral1,
        Region::UsEast1,
        Region::UsEast4,
        Region::EuropeWest1,
        Region::EuropeWest2,
        Region::EuropeWest3,
        Region::AsiaEast2,
        Region::AsiaNortheast1,
    ];

    /// Returns the region identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UsCentral1 => "us-central1",
            Self::UsEast1 => "us-east1",
            Self::UsEast4 => "us-east4",
            Self::EuropeWest1 => "europe-west1",
            Self::EuropeWest2 => "europe-west2",
            Self::EuropeWest3 => "europe-west3",
            Self::AsiaEast2 => "asia-east2",
            Self::AsiaNortheast1 => "asia-northeast1",
        }
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_choice(
                    "regions",
                    format!("unsupported region '{s}'"),
                    SUPPORTED_REGIONS,
                )
            })
    }
}

/// Memory allocated to a function instance.
///
/// # Examples
///
/// ```
/// use cloudfn::Memory;
///
/// let memory: Memory = "1GB".parse().unwrap();
/// assert_eq!(memory.megabytes(), 1024);
/// assert!("3GB".parse::<Memory>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Memory {
    /// 128MB
    #[serde(rename = "128MB")]
    Mb128,
    /// 256MB
    #[serde(rename = "256MB")]
    Mb256,
    /// 512MB
    #[serde(rename = "512MB")]
    Mb512,
    /// 1GB
    #[serde(rename = "1GB")]
    Gb1,
    /// 2GB
    #[serde(rename = "2GB")]
    Gb2,
}

impl Memory {
    /// All memory tiers, smallest first.
    pub const ALL: [Memory; 5] = [
        Memory::Mb128,
        Memory::Mb256,
        Memory::Mb512,
        Memory::Gb1,
        Memory::Gb2,
    ];

    /// Returns the tier literal (e.g. `"256MB"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mb128 => "128MB",
            Self::Mb256 => "256MB",
            Self::Mb512 => "512MB",
            Self::Gb1 => "1GB",
            Self::Gb2 => "2GB",
        }
    }

    /// Returns the allocation in megabytes.
    #[must_use]
    pub const fn megabytes(self) -> u32 {
        match self {
            Self::Mb128 => 128,
            Self::Mb256 => 256,
            Self::Mb512 => 512,
            Self::Gb1 => 1024,
            Self::Gb2 => 2048,
        }
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Memory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|memory| memory.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_choice(
                    "memory",
                    format!("unsupported memory allocation '{s}'"),
                    VALID_MEMORY_OPTIONS,
                )
            })
    }
}

/// Retry settings attached to a structured failure policy.
///
/// No retry settings are recognized yet: a policy is only valid while empty.
/// The settings map exists so a populated `retry` object can be represented
/// and rejected, rather than silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RetryPolicy {
    settings: Map<String, Value>,
}

impl RetryPolicy {
    /// Creates a retry policy carrying the given settings.
    #[must_use]
    pub fn from_settings(settings: Map<String, Value>) -> Self {
        Self { settings }
    }

    /// Returns a copy of this policy with one more setting.
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Returns `true` if no settings are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Returns the names of the settings present.
    pub fn setting_names(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }
}

/// What the platform does when a background function fails.
///
/// Both `failurePolicy: true` and `failurePolicy: { retry: {} }` mean
/// [`FailurePolicy::RetryDefault`]; the validator collapses the structured
/// form into that variant.
///
/// Serializes as `false` for [`Disabled`](FailurePolicy::Disabled) and as
/// `{"retry": {...}}` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum FailurePolicy {
    /// Failed invocations are not retried.
    Disabled,
    /// Failed invocations are retried with the platform defaults.
    RetryDefault,
    /// Failed invocations are retried with explicit settings.
    RetryWithPolicy(RetryPolicy),
}

impl FailurePolicy {
    /// Returns `true` if failed invocations will be retried.
    #[must_use]
    pub fn retries_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Collapses an empty structured policy into [`FailurePolicy::RetryDefault`].
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::RetryWithPolicy(policy) if policy.is_empty() => Self::RetryDefault,
            other => other,
        }
    }
}

impl From<bool> for FailurePolicy {
    fn from(retry: bool) -> Self {
        if retry {
            Self::RetryDefault
        } else {
            Self::Disabled
        }
    }
}

impl Serialize for FailurePolicy {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Repr<'a> {
            Flag(bool),
            Policy { retry: &'a RetryPolicy },
        }

        let empty = RetryPolicy::default();
        let repr = match self {
            Self::Disabled => Repr::Flag(false),
            Self::RetryDefault => Repr::Policy { retry: &empty },
            Self::RetryWithPolicy(policy) => Repr::Policy { retry: policy },
        };
        repr.serialize(serializer)
    }
}

/// The fragment accepted by `run_with`.
///
/// Absent fields leave the corresponding snapshot field untouched when merged.
///
/// # Examples
///
/// ```
/// use cloudfn::{Memory, RuntimeOptions};
///
/// let options = RuntimeOptions {
///     memory: Some(Memory::Gb1),
///     timeout_seconds: Some(120),
///     ..Default::default()
/// };
/// assert!(options.failure_policy.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeOptions {
    /// Retry behavior for failed invocations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<FailurePolicy>,

    /// Memory allocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Memory>,

    /// Invocation timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
}

impl RuntimeOptions {
    /// Parses and validates a dynamic fragment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the value is not a valid fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use cloudfn::RuntimeOptions;
    /// use serde_json::json;
    ///
    /// let options = RuntimeOptions::from_value(&json!({ "memory": "256MB" })).unwrap();
    /// assert_eq!(options.memory.unwrap().as_str(), "256MB");
    ///
    /// assert!(RuntimeOptions::from_value(&json!({ "timeoutSeconds": "60" })).is_err());
    /// ```
    pub fn from_value(value: &Value) -> Result<Self> {
        OptionsValidator::parse_runtime_options(value)
    }
}

impl<'de> Deserialize<'de> for RuntimeOptions {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// A complete options snapshot.
///
/// Every field is optional; absent fields defer to deployment defaults. This
/// type also serves as the partial fragment for [`OptionsMerger`].
///
/// Snapshots are values: [`with_regions`](Self::with_regions) and
/// [`with_runtime_options`](Self::with_runtime_options) validate a fragment
/// and return a new snapshot, leaving `self` untouched on failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOptions {
    /// Target regions, in the order given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<Region>>,

    /// Retry behavior for failed invocations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<FailurePolicy>,

    /// Memory allocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Memory>,

    /// Invocation timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
}

impl DeploymentOptions {
    /// Parses and validates a dynamic snapshot (runtime options plus `regions`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any field is invalid.
    pub fn from_value(value: &Value) -> Result<Self> {
        OptionsValidator::parse_deployment_options(value)
    }

    /// Validates `regions` and returns a snapshot with them set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the list is empty or contains an
    /// unsupported region.
    ///
    /// # Examples
    ///
    /// ```
    /// use cloudfn::{DeploymentOptions, Region};
    ///
    /// let base = DeploymentOptions::default();
    /// let next = base.with_regions(&["us-east1", "europe-west1"]).unwrap();
    /// assert_eq!(
    ///     next.regions,
    ///     Some(vec![Region::UsEast1, Region::EuropeWest1])
    /// );
    /// assert!(base.with_regions::<&str>(&[]).is_err());
    /// ```
    pub fn with_regions<S: AsRef<str>>(&self, regions: &[S]) -> Result<Self> {
        let regions = OptionsValidator::validate_regions(regions)?;
        Ok(self.merged(&Self {
            regions: Some(regions),
            ..Default::default()
        }))
    }

    /// Validates `options` and returns a snapshot with them merged in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the fragment is invalid.
    pub fn with_runtime_options(&self, options: &RuntimeOptions) -> Result<Self> {
        OptionsValidator::validate_runtime_options(options)?;
        Ok(self.merged(&Self::from(options.clone())))
    }

    /// Returns `self` with every present field of `fragment` overriding it.
    #[must_use]
    pub fn merged(&self, fragment: &DeploymentOptions) -> Self {
        let mut result = self.clone();
        OptionsMerger::merge_into(&mut result, fragment);
        result
    }

    /// Regions the function deploys to, falling back to [`DEFAULT_REGION`].
    #[must_use]
    pub fn effective_regions(&self) -> &[Region] {
        const DEFAULT_REGIONS: &[Region] = &[DEFAULT_REGION];

        match &self.regions {
            Some(regions) => regions.as_slice(),
            None => DEFAULT_REGIONS,
        }
    }

    /// Returns the runtime portion of this snapshot.
    #[must_use]
    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            failure_policy: self.failure_policy.clone(),
            memory: self.memory,
            timeout_seconds: self.timeout_seconds,
        }
    }
}

impl From<RuntimeOptions> for DeploymentOptions {
    fn from(options: RuntimeOptions) -> Self {
        Self {
            regions: None,
            failure_policy: options.failure_policy.map(FailurePolicy::normalized),
            memory: options.memory,
            timeout_seconds: options.timeout_seconds,
        }
    }
}

impl<'de> Deserialize<'de> for DeploymentOptions {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_region_constants_agree() {
        let names: Vec<&str> = Region::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, SUPPORTED_REGIONS);
    }

    #[test]
    fn test_memory_constants_agree() {
        let names: Vec<&str> = Memory::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, VALID_MEMORY_OPTIONS);
        assert!(Memory::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_region_parse_error_lists_supported_set() {
        let err = "us-west9".parse::<Region>().unwrap_err();
        assert_eq!(err.field(), Some("regions"));
        assert_eq!(err.allowed().len(), SUPPORTED_REGIONS.len());
        assert!(err.to_string().contains("us-west9"));
    }

    #[test]
    fn test_memory_parse_is_case_sensitive() {
        assert!("1gb".parse::<Memory>().is_err());
        assert_eq!("2GB".parse::<Memory>().unwrap(), Memory::Gb2);
    }

    #[test]
    fn test_region_serializes_as_identifier() {
        assert_eq!(
            serde_json::to_value(Region::AsiaNortheast1).unwrap(),
            json!("asia-northeast1")
        );
    }

    #[test]
    fn test_failure_policy_serialization() {
        assert_eq!(
            serde_json::to_value(FailurePolicy::Disabled).unwrap(),
            json!(false)
        );
        assert_eq!(
            serde_json::to_value(FailurePolicy::RetryDefault).unwrap(),
            json!({ "retry": {} })
        );
        let policy = RetryPolicy::default().with_setting("maxAttempts", json!(3));
        assert_eq!(
            serde_json::to_value(FailurePolicy::RetryWithPolicy(policy)).unwrap(),
            json!({ "retry": { "maxAttempts": 3 } })
        );
    }

    #[test]
    fn test_failure_policy_normalized() {
        assert_eq!(
            FailurePolicy::RetryWithPolicy(RetryPolicy::default()).normalized(),
            FailurePolicy::RetryDefault
        );
        assert_eq!(FailurePolicy::from(true), FailurePolicy::RetryDefault);
        assert_eq!(FailurePolicy::from(false), FailurePolicy::Disabled);
        assert!(!FailurePolicy::Disabled.retries_enabled());
        assert!(FailurePolicy::RetryDefault.retries_enabled());
    }

    #[test]
    fn test_deployment_options_serialization_skips_absent_fields() {
        let options = DeploymentOptions {
            regions: Some(vec![Region::UsEast1]),
            timeout_seconds: Some(60),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "regions": ["us-east1"], "timeoutSeconds": 60 })
        );
    }

    #[test]
    fn test_effective_regions_defaults_to_us_central1() {
        let options = DeploymentOptions::default();
        assert_eq!(options.effective_regions(), &[Region::UsCentral1]);

        let options = DeploymentOptions {
            regions: Some(vec![Region::EuropeWest2, Region::EuropeWest2]),
            ..Default::default()
        };
        assert_eq!(
            options.effective_regions(),
            &[Region::EuropeWest2, Region::EuropeWest2]
        );
    }

    #[test]
    fn test_with_runtime_options_failure_leaves_snapshot_unchanged() {
        let base = DeploymentOptions::default()
            .with_regions(&["us-east1"])
            .unwrap();
        let before = base.clone();

        let bad = RuntimeOptions {
            timeout_seconds: Some(541),
            ..Default::default()
        };
        assert!(base.with_runtime_options(&bad).is_err());
        assert_eq!(base, before);
    }

    #[test]
    fn test_with_runtime_options_normalizes_failure_policy() {
        let options = RuntimeOptions {
            failure_policy: Some(FailurePolicy::RetryWithPolicy(RetryPolicy::default())),
            ..Default::default()
        };
        let snapshot = DeploymentOptions::default()
            .with_runtime_options(&options)
            .unwrap();
        assert_eq!(snapshot.failure_policy, Some(FailurePolicy::RetryDefault));
    }

    #[test]
    fn test_runtime_options_deserialize_through_validator() {
        let options: RuntimeOptions =
            serde_yaml::from_str("memory: 512MB\ntimeoutSeconds: 30\nfailurePolicy: true\n")
                .unwrap();
        assert_eq!(options.memory, Some(Memory::Mb512));
        assert_eq!(options.timeout_seconds, Some(30));
        assert_eq!(options.failure_policy, Some(FailurePolicy::RetryDefault));

        let err = serde_yaml::from_str::<RuntimeOptions>("memory: 3GB\n").unwrap_err();
        assert!(err.to_string().contains("memory"));
    }

    #[test]
    fn test_deployment_options_deserialize_with_regions() {
        let options: DeploymentOptions =
            serde_json::from_value(json!({ "regions": ["asia-east2"], "memory": "128MB" }))
                .unwrap();
        assert_eq!(options.regions, Some(vec![Region::AsiaEast2]));
        assert_eq!(options.memory, Some(Memory::Mb128));
    }
}
