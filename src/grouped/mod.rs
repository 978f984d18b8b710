//! Statistics partitioned by dense integer group ids
//!
//! A grouped accumulator holds one independent [`RunningStats`] state per
//! group id in `0..groups`. Values arrive as parallel slices of ids and
//! values; results are exported row-wise ([`Summary`] per group) or columnar
//! ([`ColumnarSummary`]).
//!
//! Two layouts implement the same [`GroupedSketch`] contract:
//!
//! - [`GroupedStats`]: one [`RunningStats`] per group (array of structs)
//! - [`PackedGroupedStats`]: one column per field (struct of arrays), which
//!   keeps the hot loop on contiguous `f64` slices and makes columnar export
//!   a straight copy
//!
//! Both produce identical results for every operation.
//!
//! # Example
//!
//! ```
//! use flowmoments::grouped::{GroupedSketch, GroupedStats};
//!
//! let mut stats = GroupedStats::new(3).unwrap();
//! stats.add_batch(&[0, 1, 0, 1], &[1.0, 10.0, 3.0, 30.0]).unwrap();
//!
//! let rows = stats.export_by_group();
//! assert_eq!(rows[&0].mean(), Some(2.0));
//! assert_eq!(rows[&1].sum, 40.0);
//! assert!(rows[&2].moments.is_none());
//!
//! let columns = stats.export_columnar();
//! assert_eq!(columns.count, vec![2, 2, 0]);
//! assert!(columns.mean[2].is_nan());
//! ```
//!
//! [`RunningStats`]: crate::statistics::RunningStats

mod packed;
mod rows;

pub use packed::PackedGroupedStats;
pub use rows::GroupedStats;

use crate::statistics::{ColumnarSummary, Summary};
use crate::traits::{ArgumentError, Sketch};

#[cfg(feature = "std")]
use std::collections::BTreeMap;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;

/// Integer types usable as group ids
///
/// Negative ids and ids `>= groups` never map to a group; they are rejected,
/// not clamped or wrapped.
pub trait GroupId: Copy {
    /// Index of the group this id addresses, if it is in `[0, groups)`
    fn to_index(self, groups: usize) -> Option<usize>;

    /// The id widened for error reporting
    fn widen(self) -> i128;
}

macro_rules! impl_group_id {
    ($($t:ty),*) => {
        $(
            impl GroupId for $t {
                #[inline]
                fn to_index(self, groups: usize) -> Option<usize> {
                    usize::try_from(self).ok().filter(|&idx| idx < groups)
                }

                #[inline]
                fn widen(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_group_id!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Common contract of grouped accumulators
///
/// `Sketch::update` takes a `(group, value)` pair and panics if the group is
/// out of range, like slice indexing; the fallible entry points are
/// [`add`](GroupedSketch::add) and [`add_batch`](GroupedSketch::add_batch).
pub trait GroupedSketch: Sketch<Item = (usize, f64)> {
    /// Create an accumulator with `groups` empty groups
    ///
    /// Fails if `groups == 0`.
    fn with_groups(groups: usize) -> Result<Self, ArgumentError>
    where
        Self: Sized;

    /// Number of groups, fixed at construction
    fn groups(&self) -> usize;

    /// Add one value to one group
    fn add<I: GroupId>(&mut self, id: I, value: f64) -> Result<(), ArgumentError>;

    /// Add parallel slices of group ids and values, in order
    ///
    /// The whole batch is validated before any group is touched: on error
    /// the accumulator is unchanged.
    fn add_batch<I: GroupId>(&mut self, ids: &[I], values: &[f64]) -> Result<(), ArgumentError>;

    /// Snapshot of one group, `None` if `group` is out of range
    fn summary(&self, group: usize) -> Option<Summary>;

    /// One snapshot per group, keyed by group id in ascending order
    fn export_by_group(&self) -> BTreeMap<usize, Summary> {
        (0..self.groups())
            .filter_map(|group| self.summary(group).map(|s| (group, s)))
            .collect()
    }

    /// Index-aligned columns for all groups; empty groups hold NaN
    fn export_columnar(&self) -> ColumnarSummary {
        (0..self.groups())
            .filter_map(|group| self.summary(group))
            .collect()
    }
}

/// Check a group count at construction
pub(crate) fn check_groups(groups: usize) -> Result<(), ArgumentError> {
    if groups == 0 {
        return Err(ArgumentError::NonPositiveGroupCount { groups });
    }
    Ok(())
}

/// Resolve a single id to its group index
pub(crate) fn resolve<I: GroupId>(
    id: I,
    position: usize,
    groups: usize,
) -> Result<usize, ArgumentError> {
    id.to_index(groups).ok_or(ArgumentError::GroupOutOfRange {
        id: id.widen(),
        position,
        groups,
    })
}

/// Validate a whole batch before it is applied
pub(crate) fn validate_batch<I: GroupId>(
    groups: usize,
    ids: &[I],
    values: &[f64],
) -> Result<(), ArgumentError> {
    let result = check_batch(groups, ids, values);
    if let Err(err) = &result {
        log::debug!("rejected batch of {} pairs: {}", ids.len(), err);
    }
    result
}

fn check_batch<I: GroupId>(groups: usize, ids: &[I], values: &[f64]) -> Result<(), ArgumentError> {
    if ids.len() != values.len() {
        return Err(ArgumentError::LengthMismatch {
            ids: ids.len(),
            values: values.len(),
        });
    }
    for (position, &id) in ids.iter().enumerate() {
        resolve(id, position, groups)?;
    }
    Ok(())
}
