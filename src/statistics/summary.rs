//! Exported snapshot shapes
//!
//! A [`Summary`] is the row-wise snapshot of one accumulator. Absence of the
//! derived statistics on an empty accumulator is modelled with `Option`; only
//! [`ColumnarSummary`] downgrades it to NaN.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Derived statistics of a non-empty accumulator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moments {
    /// Arithmetic mean
    pub mean: f64,
    /// Smallest value seen
    pub min: f64,
    /// Largest value seen
    pub max: f64,
    /// Population variance, never negative
    pub variance: f64,
    /// Population standard deviation
    pub stddev: f64,
}

/// Snapshot of a single accumulator
///
/// `count` and `sum` are always concrete; the remaining statistics are
/// present or absent together.
///
/// # Example
///
/// ```
/// use flowmoments::statistics::RunningStats;
///
/// let empty = RunningStats::new().summary();
/// assert_eq!(empty.count, 0);
/// assert_eq!(empty.sum, 0.0);
/// assert!(empty.moments.is_none());
///
/// let stats: RunningStats = [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().collect();
/// let summary = stats.summary();
/// assert_eq!(summary.mean(), Some(3.0));
/// assert_eq!(summary.variance(), Some(2.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    /// Number of values incorporated
    pub count: u64,
    /// Sum of all values, 0.0 when empty
    pub sum: f64,
    /// Derived statistics, `None` when `count == 0`
    pub moments: Option<Moments>,
}

impl Summary {
    /// Snapshot of an empty accumulator
    pub const EMPTY: Summary = Summary {
        count: 0,
        sum: 0.0,
        moments: None,
    };

    /// Check if the snapshot describes an empty stream
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn mean(&self) -> Option<f64> {
        self.moments.map(|m| m.mean)
    }

    pub fn min(&self) -> Option<f64> {
        self.moments.map(|m| m.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.moments.map(|m| m.max)
    }

    pub fn variance(&self) -> Option<f64> {
        self.moments.map(|m| m.variance)
    }

    pub fn stddev(&self) -> Option<f64> {
        self.moments.map(|m| m.stddev)
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Struct-of-arrays snapshot of a grouped accumulator
///
/// Every column has one entry per group, index-aligned with the group id:
/// `mean[3]` is the mean of group 3. Empty groups report `count == 0`,
/// `sum == 0.0` and NaN in the other columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnarSummary {
    pub count: Vec<u64>,
    pub sum: Vec<f64>,
    pub mean: Vec<f64>,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub var: Vec<f64>,
    pub std: Vec<f64>,
}

impl ColumnarSummary {
    /// Create empty columns with room for `groups` entries
    pub fn with_capacity(groups: usize) -> Self {
        Self {
            count: Vec::with_capacity(groups),
            sum: Vec::with_capacity(groups),
            mean: Vec::with_capacity(groups),
            min: Vec::with_capacity(groups),
            max: Vec::with_capacity(groups),
            var: Vec::with_capacity(groups),
            std: Vec::with_capacity(groups),
        }
    }

    /// Append one group's snapshot, using NaN for absent statistics
    pub fn push(&mut self, summary: &Summary) {
        self.count.push(summary.count);
        self.sum.push(summary.sum);
        match summary.moments {
            Some(m) => {
                self.mean.push(m.mean);
                self.min.push(m.min);
                self.max.push(m.max);
                self.var.push(m.variance);
                self.std.push(m.stddev);
            }
            None => {
                self.mean.push(f64::NAN);
                self.min.push(f64::NAN);
                self.max.push(f64::NAN);
                self.var.push(f64::NAN);
                self.std.push(f64::NAN);
            }
        }
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_empty()
    }

    /// Rebuild the row-wise snapshot of one group
    ///
    /// Returns `None` if `group` is out of range.
    pub fn row(&self, group: usize) -> Option<Summary> {
        let count = *self.count.get(group)?;
        let sum = self.sum[group];
        let moments = (count > 0).then(|| Moments {
            mean: self.mean[group],
            min: self.min[group],
            max: self.max[group],
            variance: self.var[group],
            stddev: self.std[group],
        });
        Some(Summary {
            count,
            sum,
            moments,
        })
    }
}

impl FromIterator<Summary> for ColumnarSummary {
    fn from_iter<T: IntoIterator<Item = Summary>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut columns = Self::with_capacity(iter.size_hint().0);
        for summary in iter {
            columns.push(&summary);
        }
        columns
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Summary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Summary", 7)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("sum", &self.sum)?;
        state.serialize_field("mean", &self.mean())?;
        state.serialize_field("min", &self.min())?;
        state.serialize_field("max", &self.max())?;
        state.serialize_field("var", &self.variance())?;
        state.serialize_field("std", &self.stddev())?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ColumnarSummary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ColumnarSummary", 7)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("sum", &self.sum)?;
        state.serialize_field("mean", &self.mean)?;
        state.serialize_field("min", &self.min)?;
        state.serialize_field("max", &self.max)?;
        state.serialize_field("var", &self.var)?;
        state.serialize_field("std", &self.std)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> Summary {
        Summary {
            count: 5,
            sum: 15.0,
            moments: Some(Moments {
                mean: 3.0,
                min: 1.0,
                max: 5.0,
                variance: 2.0,
                stddev: 2.0f64.sqrt(),
            }),
        }
    }

    #[test]
    fn test_empty_accessors() {
        let s = Summary::EMPTY;
        assert!(s.is_empty());
        assert_eq!(s.mean(), None);
        assert_eq!(s.min(), None);
        assert_eq!(s.max(), None);
        assert_eq!(s.variance(), None);
        assert_eq!(s.stddev(), None);
        assert_eq!(Summary::default(), s);
    }

    #[test]
    fn test_columnar_uses_nan_for_empty_rows() {
        let columns: ColumnarSummary = [populated(), Summary::EMPTY].into_iter().collect();

        assert_eq!(columns.len(), 2);
        assert_eq!(columns.count, vec![5, 0]);
        assert_eq!(columns.sum, vec![15.0, 0.0]);
        assert_eq!(columns.mean[0], 3.0);
        assert!(columns.mean[1].is_nan());
        assert!(columns.min[1].is_nan());
        assert!(columns.max[1].is_nan());
        assert!(columns.var[1].is_nan());
        assert!(columns.std[1].is_nan());
    }

    #[test]
    fn test_columnar_row_restores_absence() {
        let columns: ColumnarSummary = [Summary::EMPTY, populated()].into_iter().collect();

        assert_eq!(columns.row(0), Some(Summary::EMPTY));
        assert_eq!(columns.row(1), Some(populated()));
        assert_eq!(columns.row(2), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_empty_as_nulls() {
        let value = serde_json::to_value(Summary::EMPTY).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "count": 0,
                "sum": 0.0,
                "mean": null,
                "min": null,
                "max": null,
                "var": null,
                "std": null,
            })
        );

        let value = serde_json::to_value(populated()).unwrap();
        assert_eq!(value["mean"], 3.0);
        assert_eq!(value["var"], 2.0);
    }
}
