//! Integration tests for the builder and trigger dispatch.
//!
//! These tests drive the public API the way a caller would: start a builder,
//! chain option fragments, and dispatch through a trigger family, either to
//! the built-in descriptor factory or to a caller-supplied one.

use std::sync::{Mutex, Once};

use cloudfn::triggers::{
    DatabaseFactory, HttpsFactory, PubSubFactory, Trigger, TriggerFamily,
};
use cloudfn::{
    DeploymentOptions, FailurePolicy, FunctionBuilder, Memory, Region, RuntimeOptions,
    SUPPORTED_REGIONS,
};
use serde_json::json;
use serial_test::serial;

// ============================================================================
// Test Utilities
// ============================================================================

struct WarningCounter {
    warnings: Mutex<Vec<String>>,
}

impl log::Log for WarningCounter {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() == log::Level::Warn
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            self.warnings.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static WARNINGS: WarningCounter = WarningCounter {
    warnings: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

/// Runs `f` and returns the warnings it logged. Callers must be `#[serial]`.
fn capture_warnings(f: impl FnOnce()) -> Vec<String> {
    INSTALL.call_once(|| {
        log::set_logger(&WARNINGS).unwrap();
        log::set_max_level(log::LevelFilter::Warn);
    });
    WARNINGS.warnings.lock().unwrap().clear();
    f();
    std::mem::take(&mut *WARNINGS.warnings.lock().unwrap())
}

/// A factory that returns the snapshot and arguments it was called with.
#[derive(Debug, Clone, Copy, Default)]
struct EchoFactory;

impl DatabaseFactory for EchoFactory {
    type Output = (String, DeploymentOptions);

    fn instance(&self, instance: &str, options: &DeploymentOptions) -> Self::Output {
        (format!("instance:{instance}"), options.clone())
    }

    fn reference(&self, path: &str, options: &DeploymentOptions) -> Self::Output {
        (format!("ref:{path}"), options.clone())
    }
}

impl PubSubFactory for EchoFactory {
    type Output = (String, DeploymentOptions);

    fn topic(&self, topic: &str, options: &DeploymentOptions) -> Self::Output {
        (format!("topic:{topic}"), options.clone())
    }

    fn schedule(&self, schedule: &str, options: &DeploymentOptions) -> Self::Output {
        (format!("schedule:{schedule}"), options.clone())
    }
}

impl HttpsFactory for EchoFactory {
    type Output<H> = (H, DeploymentOptions);

    fn on_request<H>(&self, handler: H, options: &DeploymentOptions) -> Self::Output<H> {
        (handler, options.clone())
    }

    fn on_call<H>(&self, handler: H, options: &DeploymentOptions) -> Self::Output<H> {
        (handler, options.clone())
    }
}

// ============================================================================
// Option chaining
// ============================================================================

#[test]
fn test_sequential_run_with_equals_combined_fragment() {
    let sequential = cloudfn::run_with(RuntimeOptions {
        memory: Some(Memory::Mb512),
        ..Default::default()
    })
    .unwrap()
    .run_with(RuntimeOptions {
        timeout_seconds: Some(90),
        ..Default::default()
    })
    .unwrap();

    let combined = cloudfn::run_with(RuntimeOptions {
        memory: Some(Memory::Mb512),
        timeout_seconds: Some(90),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(sequential.options(), combined.options());
}

#[test]
fn test_empty_region_list_rejected_with_supported_set() {
    let err = cloudfn::region::<&str>(&[]).unwrap_err();
    assert!(err.is_invalid_config());
    assert_eq!(err.allowed(), SUPPORTED_REGIONS.map(String::from));
}

#[test]
fn test_unsupported_regions_all_reported() {
    let err = cloudfn::region(&["us-east1", "moon-base1", "mars-colony2"]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("moon-base1"));
    assert!(message.contains("mars-colony2"));
    for region in SUPPORTED_REGIONS {
        assert!(message.contains(region), "message should list {region}");
    }
}

#[test]
fn test_memory_3gb_rejected_and_1gb_survives_region() {
    assert!(cloudfn::run_with_value(&json!({ "memory": "3GB" })).is_err());

    let builder = cloudfn::run_with_value(&json!({ "memory": "1GB" }))
        .unwrap()
        .region(&["asia-northeast1"])
        .unwrap();
    let descriptor = builder.auth().user();
    assert_eq!(descriptor.options.memory, Some(Memory::Gb1));
    assert_eq!(descriptor.regions(), &[Region::AsiaNortheast1]);
}

#[test]
fn test_timeout_boundaries() {
    for ok in [0, 540] {
        assert!(cloudfn::run_with_value(&json!({ "timeoutSeconds": ok })).is_ok());
    }
    for bad in [541, -1] {
        assert!(cloudfn::run_with_value(&json!({ "timeoutSeconds": bad })).is_err());
    }
}

#[test]
fn test_failure_policy_forms() {
    let err = cloudfn::run_with_value(&json!({
        "failurePolicy": { "retry": { "maxAttempts": 3 } }
    }))
    .unwrap_err();
    assert_eq!(err.field(), Some("failurePolicy.retry"));

    let structured =
        cloudfn::run_with_value(&json!({ "failurePolicy": { "retry": {} } })).unwrap();
    let flag = cloudfn::run_with_value(&json!({ "failurePolicy": true })).unwrap();
    assert_eq!(structured.options(), flag.options());
    assert_eq!(
        flag.options().failure_policy,
        Some(FailurePolicy::RetryDefault)
    );
}

#[test]
fn test_repeated_region_is_idempotent() {
    let once = cloudfn::region(&["us-east1"]).unwrap();
    let twice = once.region(&["us-east1"]).unwrap();
    assert_eq!(once.options(), twice.options());
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_custom_factory_receives_snapshot_and_arguments() {
    let builder = FunctionBuilder::new(EchoFactory)
        .region(&["europe-west3"])
        .unwrap()
        .run_with(RuntimeOptions {
            timeout_seconds: Some(30),
            ..Default::default()
        })
        .unwrap();

    let (selection, options) = builder.database().reference("/messages/{id}");
    assert_eq!(selection, "ref:/messages/{id}");
    assert_eq!(options.regions, Some(vec![Region::EuropeWest3]));
    assert_eq!(options.timeout_seconds, Some(30));

    let (selection, _) = builder.pubsub().schedule("every monday 09:00");
    assert_eq!(selection, "schedule:every monday 09:00");

    let (handler, options) = builder.https().on_request(|| "ok");
    assert_eq!(handler(), "ok");
    assert_eq!(&options, builder.options());
}

#[test]
fn test_builder_dispatches_repeatedly() {
    let builder = cloudfn::region(&["us-central1"]).unwrap();
    let first = builder.pubsub().topic("a");
    let second = builder.pubsub().topic("b");

    assert_eq!(first.family, TriggerFamily::PubSub);
    assert_eq!(first.options, second.options);
    assert_ne!(first.trigger, second.trigger);
}

#[test]
fn test_remote_config_carries_handler() {
    let deployable = cloudfn::region(&["us-east4"])
        .unwrap()
        .remote_config()
        .on_update("rollout-handler");
    assert_eq!(deployable.handler, "rollout-handler");
    assert!(matches!(
        deployable.descriptor.trigger,
        Trigger::Event { ref event_type, .. } if event_type == "google.firebase.remoteconfig.update"
    ));
}

// ============================================================================
// HTTPS warning
// ============================================================================

#[test]
#[serial(logger)]
fn test_https_with_failure_policy_warns_exactly_once_and_dispatches() {
    let builder = cloudfn::run_with_value(&json!({ "failurePolicy": true })).unwrap();

    let mut deployable = None;
    let warnings = capture_warnings(|| {
        deployable = Some(builder.https().on_request("handler"));
    });

    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("ignored"));
    let deployable = deployable.unwrap();
    assert_eq!(deployable.handler, "handler");
    assert_eq!(
        deployable.descriptor.options.failure_policy,
        Some(FailurePolicy::RetryDefault)
    );
}

#[test]
#[serial(logger)]
fn test_https_without_failure_policy_is_silent() {
    let builder = cloudfn::run_with_value(&json!({ "memory": "128MB" })).unwrap();
    let warnings = capture_warnings(|| {
        builder.https().on_call(());
    });
    assert!(warnings.is_empty());
}
