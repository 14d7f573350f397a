//! Serializable trigger descriptors.
//!
//! [`DescriptorFactory`] is the built-in factory. It turns a dispatch into a
//! [`TriggerDescriptor`] recording the family, the event source, and the
//! snapshot the function was built with. Resources use the `projects/_`
//! placeholder; deployment tooling substitutes the real project.

use std::fmt;

use serde::Serialize;

use crate::options::{DeploymentOptions, Region};
use crate::triggers::{
    AnalyticsFactory, AuthFactory, CrashlyticsFactory, DatabaseFactory, FirestoreFactory,
    HttpsFactory, PubSubFactory, RemoteConfigFactory, StorageFactory, TestLabFactory,
};

const PROJECT: &str = "projects/_";
const DEFAULT_INSTANCE: &str = "(default)";

/// The event source family a function is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TriggerFamily {
    /// HTTP requests and callable invocations.
    #[serde(rename = "https")]
    Https,
    /// Realtime database writes.
    #[serde(rename = "database")]
    Database,
    /// Document store changes.
    #[serde(rename = "firestore")]
    Firestore,
    /// Crash reporting issues.
    #[serde(rename = "crashlytics")]
    Crashlytics,
    /// Analytics events.
    #[serde(rename = "analytics")]
    Analytics,
    /// Remote config template updates.
    #[serde(rename = "remote_config")]
    RemoteConfig,
    /// Object storage changes.
    #[serde(rename = "storage")]
    Storage,
    /// Pub/sub messages and schedules.
    #[serde(rename = "pubsub")]
    PubSub,
    /// Auth user lifecycle.
    #[serde(rename = "auth")]
    Auth,
    /// Test matrix completion.
    #[serde(rename = "test_lab")]
    TestLab,
}

impl TriggerFamily {
    /// Returns the family name as used in manifests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Database => "database",
            Self::Firestore => "firestore",
            Self::Crashlytics => "crashlytics",
            Self::Analytics => "analytics",
            Self::RemoteConfig => "remote_config",
            Self::Storage => "storage",
            Self::PubSub => "pubsub",
            Self::Auth => "auth",
            Self::TestLab => "test_lab",
        }
    }
}

impl fmt::Display for TriggerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the platform invokes a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Trigger {
    /// Invoked by an HTTP request.
    Https {
        /// `true` for the callable protocol, `false` for raw requests.
        callable: bool,
    },
    /// Invoked by an event from a provider.
    #[serde(rename_all = "camelCase")]
    Event {
        /// Provider event type.
        event_type: String,
        /// Resource the event is scoped to.
        resource: String,
        /// Service hosting the resource.
        service: String,
    },
    /// Invoked on a recurring schedule.
    Schedule {
        /// Schedule expression, passed through verbatim.
        schedule: String,
    },
}

impl Trigger {
    fn event(event_type: &str, resource: impl Into<String>, service: &str) -> Self {
        Self::Event {
            event_type: event_type.to_string(),
            resource: resource.into(),
            service: service.to_string(),
        }
    }
}

/// A function definition ready for deployment tooling.
///
/// # Examples
///
/// ```
/// use cloudfn::triggers::{Trigger, TriggerFamily};
///
/// let descriptor = cloudfn::region(&["europe-west1"])
///     .unwrap()
///     .pubsub()
///     .topic("orders");
///
/// assert_eq!(descriptor.family, TriggerFamily::PubSub);
/// assert!(matches!(
///     descriptor.trigger,
///     Trigger::Event { ref resource, .. } if resource == "projects/_/topics/orders"
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerDescriptor {
    /// Family the function was dispatched through.
    pub family: TriggerFamily,
    /// Invocation source.
    pub trigger: Trigger,
    /// Snapshot at dispatch time.
    pub options: DeploymentOptions,
}

impl TriggerDescriptor {
    fn new(family: TriggerFamily, trigger: Trigger, options: &DeploymentOptions) -> Self {
        Self {
            family,
            trigger,
            options: options.clone(),
        }
    }

    /// Regions the function deploys to, defaults applied.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        self.options.effective_regions()
    }
}

/// A descriptor paired with the handler it was bound to.
#[derive(Debug, Clone)]
pub struct Deployable<H> {
    /// Definition of the function.
    pub descriptor: TriggerDescriptor,
    /// Caller-supplied handler, untouched.
    pub handler: H,
}

/// Produces [`TriggerDescriptor`]s for every trigger family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescriptorFactory;

impl HttpsFactory for DescriptorFactory {
    type Output<H> = Deployable<H>;

    fn on_request<H>(&self, handler: H, options: &DeploymentOptions) -> Deployable<H> {
        Deployable {
            descriptor: TriggerDescriptor::new(
                TriggerFamily::Https,
                Trigger::Https { callable: false },
                options,
            ),
            handler,
        }
    }

    fn on_call<H>(&self, handler: H, options: &DeploymentOptions) -> Deployable<H> {
        Deployable {
            descriptor: TriggerDescriptor::new(
                TriggerFamily::Https,
                Trigger::Https { callable: true },
                options,
            ),
            handler,
        }
    }
}

impl DatabaseFactory for DescriptorFactory {
    type Output = TriggerDescriptor;

    fn instance(&self, instance: &str, options: &DeploymentOptions) -> TriggerDescriptor {
        database_descriptor(instance, "", options)
    }

    fn reference(&self, path: &str, options: &DeploymentOptions) -> TriggerDescriptor {
        database_descriptor(DEFAULT_INSTANCE, path, options)
    }
}

fn database_descriptor(instance: &str, path: &str, options: &DeploymentOptions) -> TriggerDescriptor {
    TriggerDescriptor::new(
        TriggerFamily::Database,
        Trigger::event(
            "providers/google.firebase.database/eventTypes/ref",
            format!(
                "{PROJECT}/instances/{instance}/refs/{}",
                path.trim_start_matches('/')
            ),
            "firebaseio.com",
        ),
        options,
    )
}

impl FirestoreFactory for DescriptorFactory {
    type Output = TriggerDescriptor;

    fn document(&self, path: &str, options: &DeploymentOptions) -> TriggerDescriptor {
        firestore_descriptor(
            format!(
                "{PROJECT}/databases/{DEFAULT_INSTANCE}/documents/{}",
                path.trim_start_matches('/')
            ),
            options,
        )
    }

    fn namespace(&self, namespace: &str, options: &DeploymentOptions) -> TriggerDescriptor {
        firestore_descriptor(
            format!("{PROJECT}/databases/{DEFAULT_INSTANCE}/documents@{namespace}"),
            options,
        )
    }

    fn database(&self, database: &str, options: &DeploymentOptions) -> TriggerDescriptor {
        firestore_descriptor(format!("{PROJECT}/databases/{database}/documents"), options)
    }
}

fn firestore_descriptor(resource: String, options: &DeploymentOptions) -> TriggerDescriptor {
    TriggerDescriptor::new(
        TriggerFamily::Firestore,
        Trigger::event(
            "providers/cloud.firestore/eventTypes/document",
            resource,
            "firestore.googleapis.com",
        ),
        options,
    )
}

impl CrashlyticsFactory for DescriptorFactory {
    type Output = TriggerDescriptor;

    fn issue(&self, options: &DeploymentOptions) -> TriggerDescriptor {
        TriggerDescriptor::new(
            TriggerFamily::Crashlytics,
            Trigger::event(
                "providers/firebase.crashlytics/eventTypes/issue",
                PROJECT,
                "fabric.io",
            ),
            options,
        )
    }
}

impl AnalyticsFactory for DescriptorFactory {
    type Output = TriggerDescriptor;

    fn event(&self, event_type: &str, options: &DeploymentOptions) -> TriggerDescriptor {
        TriggerDescriptor::new(
            TriggerFamily::Analytics,
            Trigger::event(
                "providers/google.firebase.analytics/eventTypes/event.log",
                format!("{PROJECT}/events/{event_type}"),
                "app-measurement.com",
            ),
            options,
        )
    }
}

impl RemoteConfigFactory for DescriptorFactory {
    type Output<H> = Deployable<H>;

    fn on_update<H>(&self, handler: H, options: &DeploymentOptions) -> Deployable<H> {
        Deployable {
            descriptor: TriggerDescriptor::new(
                TriggerFamily::RemoteConfig,
                Trigger::event(
                    "google.firebase.remoteconfig.update",
                    PROJECT,
                    "firebaseremoteconfig.googleapis.com",
                ),
                options,
            ),
            handler,
        }
    }
}

impl StorageFactory for DescriptorFactory {
    type Output = TriggerDescriptor;

    fn bucket(&self, options: &DeploymentOptions, bucket: Option<&str>) -> TriggerDescriptor {
        TriggerDescriptor::new(
            TriggerFamily::Storage,
            Trigger::event(
                "google.storage.object",
                format!("{PROJECT}/buckets/{}", bucket.unwrap_or(DEFAULT_INSTANCE)),
                "storage.googleapis.com",
            ),
            options,
        )
    }

    fn object(&self, options: &DeploymentOptions) -> TriggerDescriptor {
        self.bucket(options, None)
    }
}

impl PubSubFactory for DescriptorFactory {
    type Output = TriggerDescriptor;

    fn topic(&self, topic: &str, options: &DeploymentOptions) -> TriggerDescriptor {
        TriggerDescriptor::new(
            TriggerFamily::PubSub,
            Trigger::event(
                "google.pubsub.topic.publish",
                format!("{PROJECT}/topics/{topic}"),
                "pubsub.googleapis.com",
            ),
            options,
        )
    }

    fn schedule(&self, schedule: &str, options: &DeploymentOptions) -> TriggerDescriptor {
        TriggerDescriptor::new(
            TriggerFamily::PubSub,
            Trigger::Schedule {
                schedule: schedule.to_string(),
            },
            options,
        )
    }
}

impl AuthFactory for DescriptorFactory {
    type Output = TriggerDescriptor;

    fn user(&self, options: &DeploymentOptions) -> TriggerDescriptor {
        TriggerDescriptor::new(
            TriggerFamily::Auth,
            Trigger::event(
                "providers/firebase.auth/eventTypes/user",
                PROJECT,
                "firebaseauth.googleapis.com",
            ),
            options,
        )
    }
}

impl TestLabFactory for DescriptorFactory {
    type Output = TriggerDescriptor;

    fn test_matrix(&self, options: &DeploymentOptions) -> TriggerDescriptor {
        TriggerDescriptor::new(
            TriggerFamily::TestLab,
            Trigger::event(
                "google.testing.testMatrix.complete",
                format!("{PROJECT}/testMatrices/{{matrixId}}"),
                "testing.googleapis.com",
            ),
            options,
        )
    }
}
