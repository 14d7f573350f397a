//! The fluent function builder.
//!
//! A [`FunctionBuilder`] owns one validated [`DeploymentOptions`] snapshot
//! and a trigger factory. `region` and `run_with` validate only their own
//! fragment, then return a new builder whose snapshot is the merge of the
//! old one and the fragment. On failure the receiver is untouched.
//!
//! Trigger accessors return views that borrow the builder; dispatching never
//! consumes or locks it, so one builder can produce any number of functions.

use serde_json::Value;

use crate::error::Result;
use crate::options::{DeploymentOptions, FailurePolicy, OptionsValidator, RuntimeOptions};
use crate::triggers::{
    AnalyticsFactory, AnalyticsTriggers, AuthFactory, AuthTriggers, CrashlyticsFactory,
    CrashlyticsTriggers, DatabaseFactory, DatabaseTriggers, DescriptorFactory, FirestoreFactory,
    FirestoreTriggers, HttpsFactory, HttpsTriggers, PubSubFactory, PubSubTriggers,
    RemoteConfigFactory, RemoteConfigTriggers, StorageFactory, StorageTriggers, TestLabFactory,
    TestLabTriggers,
};

/// Starts a builder targeting `regions`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the list
/// is empty or names an unsupported region.
///
/// # Examples
///
/// ```
/// let builder = cloudfn::region(&["us-east1", "europe-west1"]).unwrap();
/// assert_eq!(builder.options().regions.as_ref().unwrap().len(), 2);
///
/// assert!(cloudfn::region(&["us-east1", "pluto-1"]).is_err());
/// ```
pub fn region<S: AsRef<str>>(regions: &[S]) -> Result<FunctionBuilder> {
    FunctionBuilder::default().region(regions)
}

/// Starts a builder with runtime options.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
/// options are invalid.
///
/// # Examples
///
/// ```
/// use cloudfn::{Memory, RuntimeOptions};
///
/// let builder = cloudfn::run_with(RuntimeOptions {
///     memory: Some(Memory::Gb1),
///     ..Default::default()
/// })
/// .unwrap();
/// assert_eq!(builder.options().memory, Some(Memory::Gb1));
/// ```
pub fn run_with(options: RuntimeOptions) -> Result<FunctionBuilder> {
    FunctionBuilder::default().run_with(options)
}

/// Starts a builder with a dynamic runtime fragment.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
/// fragment is not a valid runtime options object.
pub fn run_with_value(value: &Value) -> Result<FunctionBuilder> {
    FunctionBuilder::default().run_with_value(value)
}

/// A chainable owner of one options snapshot.
///
/// `F` is the trigger factory; [`DescriptorFactory`] by default. Each
/// trigger accessor is available when `F` implements that family's trait.
///
/// # Examples
///
/// ```
/// use cloudfn::{FailurePolicy, Memory, RuntimeOptions};
///
/// let builder = cloudfn::region(&["europe-west1"])
///     .unwrap()
///     .run_with(RuntimeOptions {
///         memory: Some(Memory::Mb512),
///         failure_policy: Some(FailurePolicy::RetryDefault),
///         ..Default::default()
///     })
///     .unwrap();
///
/// let descriptor = builder.firestore().document("users/{uid}");
/// assert_eq!(descriptor.options.memory, Some(Memory::Mb512));
/// assert_eq!(descriptor.regions()[0].as_str(), "europe-west1");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionBuilder<F = DescriptorFactory> {
    options: DeploymentOptions,
    factory: F,
}

impl<F> FunctionBuilder<F> {
    /// Creates a builder with an empty snapshot.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            options: DeploymentOptions::default(),
            factory,
        }
    }

    /// Creates a builder from an existing snapshot.
    ///
    /// An empty structured failure policy is stored as
    /// [`FailurePolicy::RetryDefault`](crate::FailurePolicy::RetryDefault).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// snapshot fails validation.
    pub fn from_options(mut options: DeploymentOptions, factory: F) -> Result<Self> {
        OptionsValidator::validate_deployment_options(&options)?;
        options.failure_policy = options.failure_policy.map(FailurePolicy::normalized);
        Ok(Self { options, factory })
    }

    /// Replaces the factory, keeping the snapshot.
    #[must_use]
    pub fn with_factory<G>(self, factory: G) -> FunctionBuilder<G> {
        FunctionBuilder {
            options: self.options,
            factory,
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn options(&self) -> &DeploymentOptions {
        &self.options
    }

    /// The trigger factory.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Returns a builder targeting `regions`, replacing any earlier list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// list is empty or names an unsupported region.
    pub fn region<S: AsRef<str>>(&self, regions: &[S]) -> Result<Self>
    where
        F: Clone,
    {
        let options = self.options.with_regions(regions)?;
        log::debug!("regions set to {:?}", options.effective_regions());
        Ok(self.with_options(options))
    }

    /// Returns a builder with `options` merged over the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// options are invalid.
    pub fn run_with(&self, options: RuntimeOptions) -> Result<Self>
    where
        F: Clone,
    {
        let options = self.options.with_runtime_options(&options)?;
        log::debug!("runtime options merged: {:?}", options.runtime_options());
        Ok(self.with_options(options))
    }

    /// Like [`run_with`](Self::run_with), for a dynamic fragment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// fragment is not a valid runtime options object.
    pub fn run_with_value(&self, value: &Value) -> Result<Self>
    where
        F: Clone,
    {
        self.run_with(OptionsValidator::parse_runtime_options(value)?)
    }

    fn with_options(&self, options: DeploymentOptions) -> Self
    where
        F: Clone,
    {
        Self {
            options,
            factory: self.factory.clone(),
        }
    }

    /// HTTP triggers.
    ///
    /// HTTP functions are never retried, so a present failure policy is
    /// ignored; one warning is logged per call when the snapshot has one.
    pub fn https(&self) -> HttpsTriggers<'_, F>
    where
        F: HttpsFactory,
    {
        if self.options.failure_policy.is_some() {
            log::warn!("failurePolicy is ignored for HTTP-triggered functions");
        }
        HttpsTriggers::new(&self.options, &self.factory)
    }

    /// Realtime database triggers.
    pub fn database(&self) -> DatabaseTriggers<'_, F>
    where
        F: DatabaseFactory,
    {
        DatabaseTriggers::new(&self.options, &self.factory)
    }

    /// Document store triggers.
    pub fn firestore(&self) -> FirestoreTriggers<'_, F>
    where
        F: FirestoreFactory,
    {
        FirestoreTriggers::new(&self.options, &self.factory)
    }

    /// Crash reporting triggers.
    pub fn crashlytics(&self) -> CrashlyticsTriggers<'_, F>
    where
        F: CrashlyticsFactory,
    {
        CrashlyticsTriggers::new(&self.options, &self.factory)
    }

    /// Analytics triggers.
    pub fn analytics(&self) -> AnalyticsTriggers<'_, F>
    where
        F: AnalyticsFactory,
    {
        AnalyticsTriggers::new(&self.options, &self.factory)
    }

    /// Remote config triggers.
    pub fn remote_config(&self) -> RemoteConfigTriggers<'_, F>
    where
        F: RemoteConfigFactory,
    {
        RemoteConfigTriggers::new(&self.options, &self.factory)
    }

    /// Object storage triggers.
    pub fn storage(&self) -> StorageTriggers<'_, F>
    where
        F: StorageFactory,
    {
        StorageTriggers::new(&self.options, &self.factory)
    }

    /// Pub/sub triggers.
    pub fn pubsub(&self) -> PubSubTriggers<'_, F>
    where
        F: PubSubFactory,
    {
        PubSubTriggers::new(&self.options, &self.factory)
    }

    /// Auth triggers.
    pub fn auth(&self) -> AuthTriggers<'_, F>
    where
        F: AuthFactory,
    {
        AuthTriggers::new(&self.options, &self.factory)
    }

    /// Test execution triggers.
    pub fn test_lab(&self) -> TestLabTriggers<'_, F>
    where
        F: TestLabFactory,
    {
        TestLabTriggers::new(&self.options, &self.factory)
    }
}
