//! Grouped statistics stored column-wise
//!
//! Same contract as [`GroupedStats`](super::GroupedStats), but every
//! accumulator field lives in its own contiguous column. Ingestion touches
//! plain `f64` slices and columnar export copies them out directly.

use super::{check_groups, resolve, validate_batch, GroupId, GroupedSketch};
use crate::math;
use crate::statistics::{
    chan_combine, clamped_variance, finish, welford_step, ColumnarSummary, RunningStats, Summary,
};
use crate::traits::{ArgumentError, MergeError, Sketch};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::{format, vec, vec::Vec};

/// Struct-of-arrays grouped running statistics
///
/// # Example
///
/// ```
/// use flowmoments::grouped::{GroupedSketch, PackedGroupedStats};
///
/// let mut stats = PackedGroupedStats::new(2).unwrap();
/// stats.add_batch(&[1u32, 1, 1], &[2.0, 4.0, 6.0]).unwrap();
///
/// let columns = stats.export_columnar();
/// assert_eq!(columns.count, vec![0, 3]);
/// assert_eq!(columns.sum, vec![0.0, 12.0]);
/// assert_eq!(columns.mean[1], 4.0);
/// assert!(columns.var[0].is_nan());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PackedGroupedStats {
    counts: Vec<u64>,
    totals: Vec<f64>,
    means: Vec<f64>,
    m2s: Vec<f64>,
    mins: Vec<f64>,
    maxs: Vec<f64>,
}

impl PackedGroupedStats {
    /// Create a packed grouped accumulator with `groups` empty groups
    ///
    /// Returns [`ArgumentError::NonPositiveGroupCount`] if `groups == 0`.
    pub fn new(groups: usize) -> Result<Self, ArgumentError> {
        check_groups(groups)?;
        log::debug!("creating packed grouped stats with {} groups", groups);

        Ok(Self {
            counts: vec![0; groups],
            totals: vec![0.0; groups],
            means: vec![0.0; groups],
            m2s: vec![0.0; groups],
            mins: vec![f64::INFINITY; groups],
            maxs: vec![f64::NEG_INFINITY; groups],
        })
    }

    /// Build the single-stream accumulator equivalent to one group
    pub fn group(&self, group: usize) -> Option<RunningStats> {
        let count = *self.counts.get(group)?;
        if count == 0 {
            return Some(RunningStats::new());
        }
        Some(RunningStats::from_parts(
            count,
            self.totals[group],
            self.means[group],
            self.m2s[group],
            self.mins[group],
            self.maxs[group],
        ))
    }

    #[inline]
    fn add_unchecked(&mut self, group: usize, value: f64) {
        self.counts[group] += 1;
        self.totals[group] += value;

        if value < self.mins[group] {
            self.mins[group] = value;
        }
        if value > self.maxs[group] {
            self.maxs[group] = value;
        }

        welford_step(self.counts[group], &mut self.means[group], &mut self.m2s[group], value);
    }

    /// Merge another packed accumulator with the same number of groups
    pub fn merge_groups(&mut self, other: &Self) -> Result<(), MergeError> {
        if self.counts.len() != other.counts.len() {
            return Err(MergeError::IncompatibleConfig {
                expected: format!("groups={}", self.counts.len()),
                found: format!("groups={}", other.counts.len()),
            });
        }

        log::trace!("merging {} packed groups", self.counts.len());
        for g in 0..self.counts.len() {
            let n2 = other.counts[g];
            if n2 == 0 {
                continue;
            }

            let n1 = self.counts[g];
            if n1 == 0 {
                self.counts[g] = n2;
                self.totals[g] = other.totals[g];
                self.means[g] = other.means[g];
                self.m2s[g] = other.m2s[g];
                self.mins[g] = other.mins[g];
                self.maxs[g] = other.maxs[g];
                continue;
            }

            let (mean, m2) = chan_combine(
                n1,
                self.means[g],
                self.m2s[g],
                n2,
                other.means[g],
                other.m2s[g],
            );
            self.counts[g] = n1 + n2;
            self.means[g] = mean;
            self.m2s[g] = m2;
            self.totals[g] += other.totals[g];
            self.mins[g] = self.mins[g].min(other.mins[g]);
            self.maxs[g] = self.maxs[g].max(other.maxs[g]);
        }
        Ok(())
    }
}

impl GroupedSketch for PackedGroupedStats {
    fn with_groups(groups: usize) -> Result<Self, ArgumentError> {
        Self::new(groups)
    }

    fn groups(&self) -> usize {
        self.counts.len()
    }

    fn add<I: GroupId>(&mut self, id: I, value: f64) -> Result<(), ArgumentError> {
        let idx = resolve(id, 0, self.counts.len())?;
        self.add_unchecked(idx, value);
        Ok(())
    }

    fn add_batch<I: GroupId>(&mut self, ids: &[I], values: &[f64]) -> Result<(), ArgumentError> {
        validate_batch(self.counts.len(), ids, values)?;

        let groups = self.counts.len();
        for (&id, &value) in ids.iter().zip(values) {
            // every id was checked by validate_batch
            if let Some(idx) = id.to_index(groups) {
                self.add_unchecked(idx, value);
            }
        }
        Ok(())
    }

    fn summary(&self, group: usize) -> Option<Summary> {
        let count = *self.counts.get(group)?;
        Some(finish(
            count,
            self.totals[group],
            self.means[group],
            self.m2s[group],
            self.mins[group],
            self.maxs[group],
        ))
    }

    fn export_columnar(&self) -> ColumnarSummary {
        let groups = self.counts.len();
        let or_nan = |column: &[f64]| -> Vec<f64> {
            column
                .iter()
                .zip(&self.counts)
                .map(|(&v, &n)| if n > 0 { v } else { f64::NAN })
                .collect()
        };

        let var: Vec<f64> = (0..groups)
            .map(|g| match self.counts[g] {
                0 => f64::NAN,
                n => clamped_variance(self.m2s[g], n),
            })
            .collect();
        let std = var
            .iter()
            .map(|&v| if v.is_nan() { f64::NAN } else { math::sqrt(v) })
            .collect();

        ColumnarSummary {
            count: self.counts.clone(),
            sum: self.totals.clone(),
            mean: or_nan(&self.means),
            min: or_nan(&self.mins),
            max: or_nan(&self.maxs),
            var,
            std,
        }
    }
}

impl Sketch for PackedGroupedStats {
    type Item = (usize, f64);

    fn update(&mut self, item: &Self::Item) {
        let (group, value) = *item;
        assert!(
            group < self.counts.len(),
            "group {} out of range [0, {})",
            group,
            self.counts.len()
        );
        self.add_unchecked(group, value);
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        self.merge_groups(other)
    }

    fn clear(&mut self) {
        self.counts.fill(0);
        self.totals.fill(0.0);
        self.means.fill(0.0);
        self.m2s.fill(0.0);
        self.mins.fill(f64::INFINITY);
        self.maxs.fill(f64::NEG_INFINITY);
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
            + self.counts.len() * (core::mem::size_of::<u64>() + 5 * core::mem::size_of::<f64>())
    }

    fn count(&self) -> u64 {
        self.counts.iter().sum()
    }
}
