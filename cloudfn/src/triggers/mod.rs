//! Trigger-family dispatch.
//!
//! Each event source a function can bind to is a trigger family with one
//! factory trait. A factory receives the builder's validated snapshot plus
//! the caller's selection arguments and returns whatever artifact it builds;
//! this crate never inspects that artifact.
//!
//! Argument order is fixed per family. Storage takes the snapshot first;
//! every other family takes selection arguments first.
//!
//! [`DescriptorFactory`] implements every family and returns serializable
//! [`TriggerDescriptor`]s. Deployment tooling can supply its own factory
//! through [`FunctionBuilder::with_factory`](crate::FunctionBuilder::with_factory).

pub mod descriptor;
pub mod surface;

pub use descriptor::{Deployable, DescriptorFactory, Trigger, TriggerDescriptor, TriggerFamily};
pub use surface::{
    AnalyticsTriggers, AuthTriggers, CrashlyticsTriggers, DatabaseTriggers, FirestoreTriggers,
    HttpsTriggers, PubSubTriggers, RemoteConfigTriggers, StorageTriggers, TestLabTriggers,
};

use crate::options::DeploymentOptions;

/// Builds HTTP-triggered functions.
pub trait HttpsFactory {
    /// Artifact produced for a handler of type `H`.
    type Output<H>;

    /// Binds a raw request handler.
    fn on_request<H>(&self, handler: H, options: &DeploymentOptions) -> Self::Output<H>;

    /// Binds a callable (client SDK) handler.
    fn on_call<H>(&self, handler: H, options: &DeploymentOptions) -> Self::Output<H>;
}

/// Builds realtime database triggers.
pub trait DatabaseFactory {
    /// Artifact produced by this factory.
    type Output;

    /// Selects a database instance.
    fn instance(&self, instance: &str, options: &DeploymentOptions) -> Self::Output;

    /// Selects a path in the default instance.
    fn reference(&self, path: &str, options: &DeploymentOptions) -> Self::Output;
}

/// Builds document store triggers.
pub trait FirestoreFactory {
    /// Artifact produced by this factory.
    type Output;

    /// Selects a document path in the default database.
    fn document(&self, path: &str, options: &DeploymentOptions) -> Self::Output;

    /// Selects a namespace in the default database.
    fn namespace(&self, namespace: &str, options: &DeploymentOptions) -> Self::Output;

    /// Selects a named database.
    fn database(&self, database: &str, options: &DeploymentOptions) -> Self::Output;
}

/// Builds crash reporting triggers.
pub trait CrashlyticsFactory {
    /// Artifact produced by this factory.
    type Output;

    /// Selects issue events.
    fn issue(&self, options: &DeploymentOptions) -> Self::Output;
}

/// Builds analytics triggers.
pub trait AnalyticsFactory {
    /// Artifact produced by this factory.
    type Output;

    /// Selects a logged analytics event by name.
    fn event(&self, event_type: &str, options: &DeploymentOptions) -> Self::Output;
}

/// Builds remote config triggers.
pub trait RemoteConfigFactory {
    /// Artifact produced for a handler of type `H`.
    type Output<H>;

    /// Binds a handler to template updates.
    fn on_update<H>(&self, handler: H, options: &DeploymentOptions) -> Self::Output<H>;
}

/// Builds object storage triggers.
pub trait StorageFactory {
    /// Artifact produced by this factory.
    type Output;

    /// Selects a bucket, or the default bucket when `bucket` is `None`.
    fn bucket(&self, options: &DeploymentOptions, bucket: Option<&str>) -> Self::Output;

    /// Selects objects in the default bucket.
    fn object(&self, options: &DeploymentOptions) -> Self::Output;
}

/// Builds pub/sub triggers.
pub trait PubSubFactory {
    /// Artifact produced by this factory.
    type Output;

    /// Selects messages published to a topic.
    fn topic(&self, topic: &str, options: &DeploymentOptions) -> Self::Output;

    /// Selects a recurring schedule.
    fn schedule(&self, schedule: &str, options: &DeploymentOptions) -> Self::Output;
}

/// Builds auth triggers.
pub trait AuthFactory {
    /// Artifact produced by this factory.
    type Output;

    /// Selects user lifecycle events.
    fn user(&self, options: &DeploymentOptions) -> Self::Output;
}

/// Builds test execution triggers.
pub trait TestLabFactory {
    /// Artifact produced by this factory.
    type Output;

    /// Selects test matrix completion events.
    fn test_matrix(&self, options: &DeploymentOptions) -> Self::Output;
}
