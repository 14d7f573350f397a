//! Property-based tests for the options system.

use super::merger::OptionsMerger;
use super::schema::{
    DeploymentOptions, FailurePolicy, Memory, Region, RuntimeOptions, MAX_TIMEOUT_SECONDS,
    SUPPORTED_REGIONS,
};
use super::validator::OptionsValidator;
use proptest::prelude::*;
use serde_json::json;

fn memory_strategy() -> impl Strategy<Value = Memory> {
    prop::sample::select(Memory::ALL.to_vec())
}

fn region_strategy() -> impl Strategy<Value = Region> {
    prop::sample::select(Region::ALL.to_vec())
}

fn failure_policy_strategy() -> impl Strategy<Value = FailurePolicy> {
    prop_oneof![
        Just(FailurePolicy::Disabled),
        Just(FailurePolicy::RetryDefault),
    ]
}

// Valid runtime fragments with any subset of fields present
fn runtime_options_strategy() -> impl Strategy<Value = RuntimeOptions> {
    (
        prop::option::of(failure_policy_strategy()),
        prop::option::of(memory_strategy()),
        prop::option::of(0u32..=MAX_TIMEOUT_SECONDS),
    )
        .prop_map(|(failure_policy, memory, timeout_seconds)| RuntimeOptions {
            failure_policy,
            memory,
            timeout_seconds,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Chained run_with calls equal nested merges of the fragments
    #[test]
    fn sequential_fragments_equal_nested_merge(
        first in runtime_options_strategy(),
        second in runtime_options_strategy(),
    ) {
        let chained = DeploymentOptions::default()
            .with_runtime_options(&first)
            .unwrap()
            .with_runtime_options(&second)
            .unwrap();

        let nested = DeploymentOptions::default()
            .merged(&DeploymentOptions::from(first))
            .merged(&DeploymentOptions::from(second));

        prop_assert_eq!(chained, nested);
    }

    // Later fragments win field by field; absent fields fall through
    #[test]
    fn last_present_field_wins(
        first in runtime_options_strategy(),
        second in runtime_options_strategy(),
    ) {
        let low = DeploymentOptions::from(first.clone());
        let high = DeploymentOptions::from(second.clone());
        let result = OptionsMerger::merge([&low, &high]);

        prop_assert_eq!(result.memory, second.memory.or(first.memory));
        prop_assert_eq!(result.timeout_seconds, second.timeout_seconds.or(first.timeout_seconds));
        prop_assert_eq!(result.failure_policy, second.failure_policy.or(first.failure_policy));
    }

    // Runtime fragments never disturb regions set earlier
    #[test]
    fn runtime_fragment_preserves_regions(
        regions in prop::collection::vec(region_strategy(), 1..5),
        options in runtime_options_strategy(),
    ) {
        let snapshot = DeploymentOptions::default()
            .with_regions(&regions)
            .unwrap()
            .with_runtime_options(&options)
            .unwrap();

        prop_assert_eq!(snapshot.regions, Some(regions));
    }

    // Setting the same regions twice is the same as setting them once
    #[test]
    fn region_is_idempotent(regions in prop::collection::vec(region_strategy(), 1..5)) {
        let once = DeploymentOptions::default().with_regions(&regions).unwrap();
        let twice = once.with_regions(&regions).unwrap();
        prop_assert_eq!(once, twice);
    }

    // Any timeout in [0, 540] validates; anything above fails
    #[test]
    fn timeout_bounds(seconds in 0u32..=2000) {
        let result = OptionsValidator::parse_runtime_options(&json!({ "timeoutSeconds": seconds }));
        if seconds <= MAX_TIMEOUT_SECONDS {
            prop_assert_eq!(result.unwrap().timeout_seconds, Some(seconds));
        } else {
            prop_assert!(result.is_err());
        }
    }

    // Negative timeouts always fail
    #[test]
    fn negative_timeouts_rejected(seconds in i64::MIN..0) {
        let result = OptionsValidator::parse_runtime_options(&json!({ "timeoutSeconds": seconds }));
        prop_assert!(result.is_err());
    }

    // A list containing an unsupported name fails and lists every supported region
    #[test]
    fn unsupported_region_rejected(
        valid in prop::collection::vec(region_strategy(), 0..4),
        bogus in "[a-z]{3,8}-[a-z]{4,6}[0-9]",
    ) {
        prop_assume!(!SUPPORTED_REGIONS.contains(&bogus.as_str()));

        let mut names: Vec<String> = valid.iter().map(|r| r.as_str().to_string()).collect();
        names.push(bogus.clone());

        let err = OptionsValidator::validate_regions(&names).unwrap_err();
        prop_assert_eq!(err.allowed().len(), SUPPORTED_REGIONS.len());
        prop_assert!(err.to_string().contains(&bogus));
    }
}
