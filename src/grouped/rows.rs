//! Grouped statistics stored as one accumulator per group

use super::{check_groups, resolve, validate_batch, GroupId, GroupedSketch};
use crate::statistics::{RunningStats, Summary};
use crate::traits::{ArgumentError, MergeError, Sketch};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};

/// Running statistics for a fixed number of groups
///
/// Each group is a completely independent [`RunningStats`]; the group id is
/// its index. The number of groups is fixed at construction.
///
/// # Example
///
/// ```
/// use flowmoments::grouped::{GroupedSketch, GroupedStats};
/// use flowmoments::traits::Sketch;
///
/// // Two workers see different slices of the same partitioned stream
/// let mut left = GroupedStats::new(2).unwrap();
/// let mut right = GroupedStats::new(2).unwrap();
/// left.add_batch(&[0, 1, 0], &[1.0, 5.0, 2.0]).unwrap();
/// right.add_batch(&[0, 1], &[3.0, 7.0]).unwrap();
///
/// left.merge(&right).unwrap();
///
/// let group0 = left.summary(0).unwrap();
/// assert_eq!(group0.count, 3);
/// assert_eq!(group0.mean(), Some(2.0));
/// assert_eq!(left.summary(1).unwrap().max(), Some(7.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GroupedStats {
    groups: Vec<RunningStats>,
}

impl GroupedStats {
    /// Create a grouped accumulator with `groups` empty groups
    ///
    /// Returns [`ArgumentError::NonPositiveGroupCount`] if `groups == 0`.
    pub fn new(groups: usize) -> Result<Self, ArgumentError> {
        check_groups(groups)?;
        log::debug!("creating grouped stats with {} groups", groups);

        let mut accumulators = Vec::with_capacity(groups);
        accumulators.resize_with(groups, RunningStats::new);
        Ok(Self {
            groups: accumulators,
        })
    }

    /// Borrow the accumulator of one group
    pub fn group(&self, group: usize) -> Option<&RunningStats> {
        self.groups.get(group)
    }

    /// Iterate over all group accumulators in id order
    pub fn iter(&self) -> impl Iterator<Item = &RunningStats> + '_ {
        self.groups.iter()
    }

    /// Snapshot of every group, indexed by group id
    pub fn summaries(&self) -> Vec<Summary> {
        self.groups.iter().map(RunningStats::summary).collect()
    }

    /// Merge another grouped accumulator with the same number of groups
    ///
    /// Groups are merged pairwise by id.
    pub fn merge_groups(&mut self, other: &Self) -> Result<(), MergeError> {
        if self.groups.len() != other.groups.len() {
            return Err(MergeError::IncompatibleConfig {
                expected: format!("groups={}", self.groups.len()),
                found: format!("groups={}", other.groups.len()),
            });
        }

        log::trace!("merging {} groups", self.groups.len());
        for (left, right) in self.groups.iter_mut().zip(other.groups.iter()) {
            left.merge_stats(right);
        }
        Ok(())
    }
}

impl GroupedSketch for GroupedStats {
    fn with_groups(groups: usize) -> Result<Self, ArgumentError> {
        Self::new(groups)
    }

    fn groups(&self) -> usize {
        self.groups.len()
    }

    fn add<I: GroupId>(&mut self, id: I, value: f64) -> Result<(), ArgumentError> {
        let idx = resolve(id, 0, self.groups.len())?;
        self.groups[idx].add(value);
        Ok(())
    }

    fn add_batch<I: GroupId>(&mut self, ids: &[I], values: &[f64]) -> Result<(), ArgumentError> {
        validate_batch(self.groups.len(), ids, values)?;

        let groups = self.groups.len();
        for (&id, &value) in ids.iter().zip(values) {
            // every id was checked by validate_batch
            if let Some(idx) = id.to_index(groups) {
                self.groups[idx].add(value);
            }
        }
        Ok(())
    }

    fn summary(&self, group: usize) -> Option<Summary> {
        self.groups.get(group).map(RunningStats::summary)
    }
}

impl Sketch for GroupedStats {
    type Item = (usize, f64);

    fn update(&mut self, item: &Self::Item) {
        let (group, value) = *item;
        self.groups[group].add(value);
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        self.merge_groups(other)
    }

    fn clear(&mut self) {
        for group in &mut self.groups {
            group.clear();
        }
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + self.groups.len() * core::mem::size_of::<RunningStats>()
    }

    fn count(&self) -> u64 {
        self.groups.iter().map(RunningStats::len).sum()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GroupedStats {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("GroupedStats", 1)?;
        state.serialize_field("groups", &self.groups)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GroupedStats {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct GroupedData {
            groups: Vec<RunningStats>,
        }

        let data = GroupedData::deserialize(deserializer)?;
        check_groups(data.groups.len()).map_err(serde::de::Error::custom)?;
        Ok(GroupedStats {
            groups: data.groups,
        })
    }
}
