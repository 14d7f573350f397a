//! Option merging.
//!
//! Merging is a field-wise shallow override: a field present in the source
//! replaces the target's field, an absent field leaves it alone. Nothing is
//! accumulated, so setting `regions` twice keeps only the second list.

use crate::options::schema::DeploymentOptions;

/// Merges option fragments into a snapshot.
///
/// # Examples
///
/// ```
/// use cloudfn::{DeploymentOptions, Memory, Region};
/// use cloudfn::options::OptionsMerger;
///
/// let mut snapshot = DeploymentOptions {
///     regions: Some(vec![Region::UsEast1]),
///     ..Default::default()
/// };
/// let fragment = DeploymentOptions {
///     memory: Some(Memory::Gb1),
///     ..Default::default()
/// };
///
/// OptionsMerger::merge_into(&mut snapshot, &fragment);
/// assert_eq!(snapshot.regions, Some(vec![Region::UsEast1]));
/// assert_eq!(snapshot.memory, Some(Memory::Gb1));
/// ```
pub struct OptionsMerger;

impl OptionsMerger {
    /// Merge fragments in order, lowest precedence first.
    #[must_use]
    pub fn merge<'a, I>(fragments: I) -> DeploymentOptions
    where
        I: IntoIterator<Item = &'a DeploymentOptions>,
    {
        let mut result = DeploymentOptions::default();
        for fragment in fragments {
            Self::merge_into(&mut result, fragment);
        }
        result
    }

    /// Merge source into target (source overwrites target).
    pub fn merge_into(target: &mut DeploymentOptions, source: &DeploymentOptions) {
        if source.regions.is_some() {
            target.regions.clone_from(&source.regions);
        }

        if source.failure_policy.is_some() {
            target.failure_policy.clone_from(&source.failure_policy);
        }

        if source.memory.is_some() {
            target.memory = source.memory;
        }

        if source.timeout_seconds.is_some() {
            target.timeout_seconds = source.timeout_seconds;
        }
    }
}
