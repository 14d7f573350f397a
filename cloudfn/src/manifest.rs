//! Function manifests.
//!
//! A manifest (`cloudfn.yaml`) declares a set of functions: shared option
//! `defaults`, then one entry per function with its own `options` and a
//! `trigger` selection.
//!
//! ```yaml
//! defaults:
//!   regions: [europe-west1]
//!   memory: 256MB
//! functions:
//!   - name: api
//!     trigger:
//!       https: on_request
//!   - name: onUserWrite
//!     options:
//!       timeoutSeconds: 60
//!       failurePolicy: true
//!     trigger:
//!       firestore:
//!         document: users/{uid}
//! ```
//!
//! Option fragments stay dynamic until [`Manifest::resolve`] runs them
//! through the same validators and [`FunctionBuilder`] as library callers.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::FunctionBuilder;
use crate::error::{Error, Result};
use crate::options::{DeploymentOptions, OptionsMerger, OptionsValidator};
use crate::triggers::{DescriptorFactory, TriggerDescriptor};

/// File name looked up by [`Manifest::discover`].
pub const MANIFEST_FILE_NAME: &str = "cloudfn.yaml";

/// A parsed, not yet validated manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Options shared by every function; may include `regions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<Value>,

    /// Declared functions, in file order.
    #[serde(default)]
    pub functions: Vec<FunctionSpec>,
}

/// One declared function.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec {
    /// Unique function name.
    pub name: String,

    /// Per-function options; may include `regions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,

    /// Event source selection.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub trigger: TriggerSpec,
}

/// Trigger selection, keyed by family.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSpec {
    /// `https: on_request | on_call`
    Https(HttpsTrigger),
    /// `database: { instance: NAME } | { ref: PATH }`
    Database(DatabaseTrigger),
    /// `firestore: { document: PATH } | { namespace: NS } | { database: NAME }`
    Firestore(FirestoreTrigger),
    /// `crashlytics: issue`
    Crashlytics(CrashlyticsTrigger),
    /// `analytics: { event: NAME }`
    Analytics(AnalyticsTrigger),
    /// `remote_config: on_update`
    RemoteConfig(RemoteConfigTrigger),
    /// `storage: object | { bucket: NAME }`
    Storage(StorageTrigger),
    /// `pubsub: { topic: NAME } | { schedule: EXPR }`
    #[serde(rename = "pubsub")]
    PubSub(PubSubTrigger),
    /// `auth: user`
    Auth(AuthTrigger),
    /// `test_lab: test_matrix`
    TestLab(TestLabTrigger),
}

/// HTTP entry point.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpsTrigger {
    OnRequest,
    OnCall,
}

/// Realtime database selection.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseTrigger {
    Instance(String),
    #[serde(rename = "ref")]
    Reference(String),
}

/// Document store selection.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FirestoreTrigger {
    Document(String),
    Namespace(String),
    Database(String),
}

/// Crash reporting selection.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrashlyticsTrigger {
    Issue,
}

/// Analytics selection.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsTrigger {
    Event(String),
}

/// Remote config entry point.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteConfigTrigger {
    OnUpdate,
}

/// Object storage selection.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageTrigger {
    Object,
    Bucket(String),
}

/// Pub/sub selection.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PubSubTrigger {
    Topic(String),
    Schedule(String),
}

/// Auth selection.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthTrigger {
    User,
}

/// Test execution selection.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestLabTrigger {
    TestMatrix,
}

impl TriggerSpec {
    /// Dispatches this selection through `builder`.
    ///
    /// Handler-carrying entry points are bound to `()`; only the descriptor
    /// is kept.
    #[must_use]
    pub fn dispatch(&self, builder: &FunctionBuilder) -> TriggerDescriptor {
        match self {
            Self::Https(HttpsTrigger::OnRequest) => builder.https().on_request(()).descriptor,
            Self::Https(HttpsTrigger::OnCall) => builder.https().on_call(()).descriptor,
            Self::Database(DatabaseTrigger::Instance(name)) => builder.database().instance(name),
            Self::Database(DatabaseTrigger::Reference(path)) => builder.database().reference(path),
            Self::Firestore(FirestoreTrigger::Document(path)) => {
                builder.firestore().document(path)
            }
            Self::Firestore(FirestoreTrigger::Namespace(ns)) => builder.firestore().namespace(ns),
            Self::Firestore(FirestoreTrigger::Database(name)) => {
                builder.firestore().database(name)
            }
            Self::Crashlytics(CrashlyticsTrigger::Issue) => builder.crashlytics().issue(),
            Self::Analytics(AnalyticsTrigger::Event(name)) => builder.analytics().event(name),
            Self::RemoteConfig(RemoteConfigTrigger::OnUpdate) => {
                builder.remote_config().on_update(()).descriptor
            }
            Self::Storage(StorageTrigger::Object) => builder.storage().object(),
            Self::Storage(StorageTrigger::Bucket(name)) => {
                builder.storage().bucket(Some(name.as_str()))
            }
            Self::PubSub(PubSubTrigger::Topic(topic)) => builder.pubsub().topic(topic),
            Self::PubSub(PubSubTrigger::Schedule(expr)) => builder.pubsub().schedule(expr),
            Self::Auth(AuthTrigger::User) => builder.auth().user(),
            Self::TestLab(TestLabTrigger::TestMatrix) => builder.test_lab().test_matrix(),
        }
    }
}

/// A validated function ready for deployment tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFunction {
    /// Function name.
    pub name: String,
    /// Trigger and effective options.
    #[serde(flatten)]
    pub descriptor: TriggerDescriptor,
}

impl Manifest {
    /// Loads a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the file does not exist, or an I/O or
    /// parse error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound {
                resource: format!("manifest {}", path.display()),
            });
        }

        let contents = fs::read_to_string(path)?;
        log::debug!("loaded manifest from {}", path.display());
        Self::from_yaml_str(&contents)
    }

    /// Parses a manifest from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if the document is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cloudfn::Manifest;
    ///
    /// let manifest = Manifest::from_yaml_str(
    ///     "functions:\n  - name: nightly\n    trigger:\n      pubsub:\n        schedule: every 24 hours\n",
    /// )
    /// .unwrap();
    /// assert_eq!(manifest.functions.len(), 1);
    /// ```
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Finds the nearest manifest walking up from `start_dir`.
    #[must_use]
    pub fn discover(start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(MANIFEST_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Position of the function named `name` in [`functions`](Self::functions)
    /// and in the output of [`resolve`](Self::resolve).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no function has that name.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.functions
            .iter()
            .position(|function| function.name == name)
            .ok_or_else(|| Error::NotFound {
                resource: format!("function '{name}'"),
            })
    }

    /// Validates every function and builds its descriptor.
    ///
    /// Options are layered lowest first: manifest `defaults`, then
    /// `overrides` (typically from the environment), then the function's
    /// own `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] with the field path inside the
    /// manifest (e.g. `functions[1].options.memory`) for the first invalid
    /// entry.
    pub fn resolve(&self, overrides: &DeploymentOptions) -> Result<Vec<ResolvedFunction>> {
        let defaults = match &self.defaults {
            Some(value) => parse_fragment(value, "defaults")?,
            None => DeploymentOptions::default(),
        };
        let base = OptionsMerger::merge([&defaults, overrides]);
        let base = FunctionBuilder::from_options(base, DescriptorFactory)?;

        self.check_names()?;

        self.functions
            .iter()
            .enumerate()
            .map(|(i, function)| {
                let builder = match &function.options {
                    Some(value) => {
                        let context = format!("functions[{i}].options");
                        let fragment = parse_fragment(value, &context)?;
                        apply_fragment(&base, &fragment)
                            .map_err(|err| err.in_context(&context))?
                    }
                    None => base.clone(),
                };

                log::debug!("resolving function '{}'", function.name);
                Ok(ResolvedFunction {
                    name: function.name.clone(),
                    descriptor: function.trigger.dispatch(&builder),
                })
            })
            .collect()
    }

    fn check_names(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (i, function) in self.functions.iter().enumerate() {
            let field = format!("functions[{i}].name");
            if function.name.trim().is_empty() {
                return Err(Error::invalid(field, "must not be empty"));
            }
            if !seen.insert(function.name.as_str()) {
                return Err(Error::invalid(
                    field,
                    format!("duplicate function name '{}'", function.name),
                ));
            }
        }
        Ok(())
    }
}

fn parse_fragment(value: &Value, context: &str) -> Result<DeploymentOptions> {
    OptionsValidator::parse_deployment_options(value).map_err(|err| match err.field() {
        // The whole fragment is the offending field
        Some("options") => Error::invalid(context, err_reason(&err)),
        _ => err.in_context(context),
    })
}

fn err_reason(err: &Error) -> String {
    match err {
        Error::InvalidConfig { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

fn apply_fragment(base: &FunctionBuilder, fragment: &DeploymentOptions) -> Result<FunctionBuilder> {
    let builder = match &fragment.regions {
        Some(regions) => base.region(regions.as_slice())?,
        None => base.clone(),
    };
    builder.run_with(fragment.runtime_options())
}
