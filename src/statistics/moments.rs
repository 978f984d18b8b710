//! Running statistics (count, sum, mean, variance, min, max)
//!
//! Computes streaming statistics using Welford's numerically stable online algorithm.
//! Supports merging for distributed computation using Chan et al.'s combination rule.

use super::summary::{Moments, Summary};
use crate::math;
use crate::traits::{MergeError, Sketch};

/// Incorporate one value into a Welford state whose `count` already includes it.
///
/// The order of operations is fixed: `delta2` must use the updated mean.
#[inline]
pub(crate) fn welford_step(count: u64, mean: &mut f64, m2: &mut f64, value: f64) {
    let delta = value - *mean;
    *mean += delta / count as f64;
    let delta2 = value - *mean;
    *m2 += delta * delta2;
}

/// Combine two non-empty Welford states, returning the merged `(mean, m2)`.
#[inline]
pub(crate) fn chan_combine(
    n1: u64,
    mean1: f64,
    m2_1: f64,
    n2: u64,
    mean2: f64,
    m2_2: f64,
) -> (f64, f64) {
    let n1 = n1 as f64;
    let n2 = n2 as f64;
    let combined = n1 + n2;
    let delta = mean2 - mean1;

    let mean = (n1 * mean1 + n2 * mean2) / combined;
    let m2 = m2_1 + m2_2 + delta * delta * n1 * n2 / combined;
    (mean, m2)
}

/// Divide `m2` into a variance, clamping rounding noise below zero.
///
/// Only negative values are clamped; a NaN from non-finite input stays NaN.
#[inline]
pub(crate) fn clamped_variance(m2: f64, divisor: u64) -> f64 {
    let variance = m2 / divisor as f64;
    if variance < 0.0 {
        0.0
    } else {
        variance
    }
}

/// Derive the exported snapshot from raw accumulator fields.
#[inline]
pub(crate) fn finish(count: u64, total: f64, mean: f64, m2: f64, min: f64, max: f64) -> Summary {
    if count == 0 {
        return Summary::EMPTY;
    }

    let variance = clamped_variance(m2, count);
    Summary {
        count,
        sum: total,
        moments: Some(Moments {
            mean,
            min,
            max,
            variance,
            stddev: math::sqrt(variance),
        }),
    }
}

/// Running statistics calculator using Welford's algorithm
///
/// Computes count, sum, mean, variance, standard deviation, min, and max in a
/// single pass with O(1) memory. Uses Welford's numerically stable algorithm
/// to avoid catastrophic cancellation.
///
/// # Example
///
/// ```
/// use flowmoments::statistics::RunningStats;
///
/// let mut stats = RunningStats::new();
///
/// for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     stats.add(value);
/// }
///
/// assert_eq!(stats.sum(), 40.0);
/// assert!((stats.mean().unwrap() - 5.0).abs() < 0.001);
/// assert!((stats.variance().unwrap() - 4.0).abs() < 0.001);
/// assert!((stats.stddev().unwrap() - 2.0).abs() < 0.001);
/// assert_eq!(stats.min(), Some(2.0));
/// assert_eq!(stats.max(), Some(9.0));
/// ```
///
/// # Distributed Usage
///
/// ```
/// use flowmoments::statistics::RunningStats;
/// use flowmoments::traits::Sketch;
///
/// let mut stats1 = RunningStats::new();
/// let mut stats2 = RunningStats::new();
///
/// // Worker 1
/// stats1.add_all(&[1.0, 2.0, 3.0]);
///
/// // Worker 2
/// stats2.add_all(&[4.0, 5.0]);
///
/// // Merge
/// stats1.merge(&stats2).unwrap();
///
/// let summary = stats1.summary();
/// assert_eq!(summary.count, 5);
/// assert_eq!(summary.sum, 15.0);
/// assert_eq!(summary.mean(), Some(3.0));
/// assert_eq!(summary.variance(), Some(2.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RunningStats {
    /// Number of values seen
    count: u64,
    /// Running sum
    total: f64,
    /// Running mean
    mean: f64,
    /// Sum of squared differences from mean (M2 in Welford's algorithm)
    m2: f64,
    /// Minimum value
    min: f64,
    /// Maximum value
    max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    /// Create a new empty statistics accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            total: 0.0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add a value to the statistics
    ///
    /// NaN and infinite values are incorporated like any other value. A NaN
    /// propagates into the sum, mean, and variance but leaves min and max
    /// untouched, since it compares false against everything.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.total += value;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }

        welford_step(self.count, &mut self.mean, &mut self.m2, value);
    }

    /// Add every value in a slice, in order
    pub fn add_all(&mut self, values: &[f64]) {
        for &value in values {
            self.add(value);
        }
    }

    /// Get the number of values
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the sum of all values (0.0 when empty)
    pub fn sum(&self) -> f64 {
        self.total
    }

    /// Get the mean (average)
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Get the population variance
    ///
    /// This is the variance assuming the data represents the entire population.
    /// Use `sample_variance()` if the data is a sample.
    pub fn variance(&self) -> Option<f64> {
        (self.count > 0).then(|| clamped_variance(self.m2, self.count))
    }

    /// Get the sample variance
    ///
    /// This is the unbiased variance estimator (Bessel's correction).
    /// Returns `None` with fewer than two values.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| clamped_variance(self.m2, self.count - 1))
    }

    /// Get the population standard deviation
    pub fn stddev(&self) -> Option<f64> {
        self.variance().map(math::sqrt)
    }

    /// Get the sample standard deviation
    pub fn sample_stddev(&self) -> Option<f64> {
        self.sample_variance().map(math::sqrt)
    }

    /// Get the minimum value
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    /// Get the maximum value
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// Snapshot the exported statistics without mutating state
    pub fn summary(&self) -> Summary {
        finish(self.count, self.total, self.mean, self.m2, self.min, self.max)
    }

    /// Merge with another RunningStats using parallel algorithm
    ///
    /// Uses Chan et al.'s parallel algorithm for combining statistics. The
    /// result matches a single pass over both streams up to rounding, in
    /// either merge direction.
    pub fn merge_stats(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }

        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let (mean, m2) = chan_combine(
            self.count,
            self.mean,
            self.m2,
            other.count,
            other.mean,
            other.m2,
        );

        self.count += other.count;
        self.mean = mean;
        self.m2 = m2;
        self.total += other.total;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Return the merge of `self` and `other` without mutating either
    pub fn merged(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.merge_stats(other);
        out
    }

    /// Rebuild an accumulator from raw fields of a non-empty state
    #[cfg(feature = "grouped")]
    pub(crate) fn from_parts(
        count: u64,
        total: f64,
        mean: f64,
        m2: f64,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            count,
            total,
            mean,
            m2,
            min,
            max,
        }
    }

    #[cfg(test)]
    pub(crate) fn force_m2(&mut self, m2: f64) {
        self.m2 = m2;
    }
}

impl Sketch for RunningStats {
    type Item = f64;

    fn update(&mut self, item: &Self::Item) {
        self.add(*item);
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        self.merge_stats(other);
        Ok(())
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Extend<f64> for RunningStats {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<'a> Extend<&'a f64> for RunningStats {
    fn extend<T: IntoIterator<Item = &'a f64>>(&mut self, iter: T) {
        for &value in iter {
            self.add(value);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

/// An `f64` that survives text formats: non-finite values are written as
/// the strings `"NaN"`, `"inf"` and `"-inf"` when the format is human
/// readable, since JSON and friends have no literal for them.
#[cfg(feature = "serde")]
struct Float(f64);

#[cfg(feature = "serde")]
impl serde::Serialize for Float {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let v = self.0;
        if v.is_finite() || !serializer.is_human_readable() {
            serializer.serialize_f64(v)
        } else if v.is_nan() {
            serializer.serialize_str("NaN")
        } else if v > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Float {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FloatVisitor;

        impl serde::de::Visitor<'_> for FloatVisitor {
            type Value = Float;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a number or one of \"NaN\", \"inf\", \"-inf\"")
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Float, E> {
                Ok(Float(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Float, E> {
                Ok(Float(v as f64))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Float, E> {
                Ok(Float(v as f64))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Float, E> {
                match v {
                    "NaN" => Ok(Float(f64::NAN)),
                    "inf" => Ok(Float(f64::INFINITY)),
                    "-inf" => Ok(Float(f64::NEG_INFINITY)),
                    _ => Err(E::invalid_value(serde::de::Unexpected::Str(v), &self)),
                }
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_any(FloatVisitor)
        } else {
            deserializer.deserialize_f64(FloatVisitor)
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RunningStats {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("RunningStats", 6)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("total", &Float(self.total))?;
        state.serialize_field("mean", &Float(self.mean))?;
        state.serialize_field("m2", &Float(self.m2))?;
        state.serialize_field("min", &Float(self.min))?;
        state.serialize_field("max", &Float(self.max))?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RunningStats {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct StatsData {
            count: u64,
            total: Float,
            mean: Float,
            m2: Float,
            min: Float,
            max: Float,
        }

        let data = StatsData::deserialize(deserializer)?;
        if data.count == 0 {
            return Ok(RunningStats::new());
        }
        Ok(RunningStats {
            count: data.count,
            total: data.total.0,
            mean: data.mean.0,
            m2: data.m2.0,
            min: data.min.0,
            max: data.max.0,
        })
    }
}
