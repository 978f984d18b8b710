//! Core traits and errors for streaming accumulators
//!
//! Every accumulator implements the base [`Sketch`] trait, which carries the
//! `merge` operation used to combine partial results across workers.

use core::fmt::Debug;

#[cfg(feature = "std")]
use std::string::String;

#[cfg(not(feature = "std"))]
use alloc::string::String;

/// Error during sketch merge operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Sketches have incompatible configurations
    IncompatibleConfig {
        expected: String,
        found: String,
    },
}

impl core::fmt::Display for MergeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MergeError::IncompatibleConfig { expected, found } => {
                write!(f, "incompatible config: expected {}, found {}", expected, found)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MergeError {}

/// Invalid argument passed to a grouped accumulator
///
/// All variants describe a caller error; nothing is retried or repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    /// Group count must be at least one
    NonPositiveGroupCount { groups: usize },
    /// Parallel id/value sequences differ in length
    LengthMismatch { ids: usize, values: usize },
    /// Group id outside `[0, groups)`
    GroupOutOfRange {
        /// Offending id, widened so signed and unsigned ids both fit
        id: i128,
        /// Index of the offending pair in the batch
        position: usize,
        groups: usize,
    },
}

impl core::fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ArgumentError::NonPositiveGroupCount { groups } => {
                write!(f, "group count must be > 0, got {}", groups)
            }
            ArgumentError::LengthMismatch { ids, values } => {
                write!(
                    f,
                    "group ids and values must have the same length: {} ids, {} values",
                    ids, values
                )
            }
            ArgumentError::GroupOutOfRange {
                id,
                position,
                groups,
            } => {
                write!(
                    f,
                    "group id {} at position {} out of range [0, {})",
                    id, position, groups
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ArgumentError {}

/// Core trait for all streaming sketches
pub trait Sketch: Clone + Debug {
    /// The type of item this sketch processes
    type Item: ?Sized;

    /// Add an item to the sketch
    fn update(&mut self, item: &Self::Item);

    /// Merge another sketch into this one
    ///
    /// Returns an error if sketches are incompatible
    fn merge(&mut self, other: &Self) -> Result<(), MergeError>;

    /// Reset sketch to empty state
    fn clear(&mut self);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of items processed
    fn count(&self) -> u64;

    /// Check if sketch is empty
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_error_messages() {
        let err = ArgumentError::GroupOutOfRange {
            id: -1,
            position: 3,
            groups: 4,
        };
        assert_eq!(err.to_string(), "group id -1 at position 3 out of range [0, 4)");

        let err = ArgumentError::LengthMismatch { ids: 2, values: 3 };
        assert!(err.to_string().contains("same length"));

        let err = ArgumentError::NonPositiveGroupCount { groups: 0 };
        assert_eq!(err.to_string(), "group count must be > 0, got 0");
    }

    #[test]
    fn test_merge_error_message() {
        let err = MergeError::IncompatibleConfig {
            expected: "groups=4".into(),
            found: "groups=5".into(),
        };
        assert_eq!(err.to_string(), "incompatible config: expected groups=4, found groups=5");
    }
}
