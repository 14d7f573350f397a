//! Read-only trigger views over a builder.
//!
//! A view borrows the builder's snapshot and factory; each method forwards
//! both, plus its own arguments, to exactly one factory call and returns the
//! result unchanged. Views perform no validation and never modify the
//! builder. Because a view borrows the builder, the builder cannot change
//! while the view is alive, so every call sees the builder's latest snapshot.

use crate::options::DeploymentOptions;
use crate::triggers::{
    AnalyticsFactory, AuthFactory, CrashlyticsFactory, DatabaseFactory, FirestoreFactory,
    HttpsFactory, PubSubFactory, RemoteConfigFactory, StorageFactory, TestLabFactory,
};

macro_rules! trigger_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'a, F> {
            options: &'a DeploymentOptions,
            factory: &'a F,
        }

        impl<'a, F> $name<'a, F> {
            pub(crate) fn new(options: &'a DeploymentOptions, factory: &'a F) -> Self {
                Self { options, factory }
            }

            /// The snapshot this view forwards.
            #[must_use]
            pub fn options(&self) -> &'a DeploymentOptions {
                self.options
            }
        }
    };
}

trigger_view!(
    /// HTTP entry points: `on_request`, `on_call`.
    HttpsTriggers
);
trigger_view!(
    /// Realtime database entry points: `instance`, `reference`.
    DatabaseTriggers
);
trigger_view!(
    /// Document store entry points: `document`, `namespace`, `database`.
    FirestoreTriggers
);
trigger_view!(
    /// Crash reporting entry point: `issue`.
    CrashlyticsTriggers
);
trigger_view!(
    /// Analytics entry point: `event`.
    AnalyticsTriggers
);
trigger_view!(
    /// Remote config entry point: `on_update`.
    RemoteConfigTriggers
);
trigger_view!(
    /// Object storage entry points: `bucket`, `object`.
    StorageTriggers
);
trigger_view!(
    /// Pub/sub entry points: `topic`, `schedule`.
    PubSubTriggers
);
trigger_view!(
    /// Auth entry point: `user`.
    AuthTriggers
);
trigger_view!(
    /// Test execution entry point: `test_matrix`.
    TestLabTriggers
);

impl<F: HttpsFactory> HttpsTriggers<'_, F> {
    /// Binds a raw request handler.
    pub fn on_request<H>(&self, handler: H) -> F::Output<H> {
        self.factory.on_request(handler, self.options)
    }

    /// Binds a callable handler.
    pub fn on_call<H>(&self, handler: H) -> F::Output<H> {
        self.factory.on_call(handler, self.options)
    }
}

impl<F: DatabaseFactory> DatabaseTriggers<'_, F> {
    /// Selects a database instance.
    pub fn instance(&self, instance: &str) -> F::Output {
        self.factory.instance(instance, self.options)
    }

    /// Selects a path in the default instance.
    pub fn reference(&self, path: &str) -> F::Output {
        self.factory.reference(path, self.options)
    }
}

impl<F: FirestoreFactory> FirestoreTriggers<'_, F> {
    /// Selects a document path.
    pub fn document(&self, path: &str) -> F::Output {
        self.factory.document(path, self.options)
    }

    /// Selects a namespace.
    pub fn namespace(&self, namespace: &str) -> F::Output {
        self.factory.namespace(namespace, self.options)
    }

    /// Selects a named database.
    pub fn database(&self, database: &str) -> F::Output {
        self.factory.database(database, self.options)
    }
}

impl<F: CrashlyticsFactory> CrashlyticsTriggers<'_, F> {
    /// Selects issue events.
    pub fn issue(&self) -> F::Output {
        self.factory.issue(self.options)
    }
}

impl<F: AnalyticsFactory> AnalyticsTriggers<'_, F> {
    /// Selects a logged event by name.
    pub fn event(&self, event_type: &str) -> F::Output {
        self.factory.event(event_type, self.options)
    }
}

impl<F: RemoteConfigFactory> RemoteConfigTriggers<'_, F> {
    /// Binds a handler to template updates.
    pub fn on_update<H>(&self, handler: H) -> F::Output<H> {
        self.factory.on_update(handler, self.options)
    }
}

impl<F: StorageFactory> StorageTriggers<'_, F> {
    /// Selects a bucket, or the default bucket when `bucket` is `None`.
    pub fn bucket(&self, bucket: Option<&str>) -> F::Output {
        self.factory.bucket(self.options, bucket)
    }

    /// Selects objects in the default bucket.
    pub fn object(&self) -> F::Output {
        self.factory.object(self.options)
    }
}

impl<F: PubSubFactory> PubSubTriggers<'_, F> {
    /// Selects messages published to a topic.
    pub fn topic(&self, topic: &str) -> F::Output {
        self.factory.topic(topic, self.options)
    }

    /// Selects a recurring schedule.
    pub fn schedule(&self, schedule: &str) -> F::Output {
        self.factory.schedule(schedule, self.options)
    }
}

impl<F: AuthFactory> AuthTriggers<'_, F> {
    /// Selects user lifecycle events.
    pub fn user(&self) -> F::Output {
        self.factory.user(self.options)
    }
}

impl<F: TestLabFactory> TestLabTriggers<'_, F> {
    /// Selects test matrix completion events.
    pub fn test_matrix(&self) -> F::Output {
        self.factory.test_matrix(self.options)
    }
}
