//! # Flowmoments
//!
//! Streaming, mergeable moment statistics for Rust.
//!
//! Flowmoments computes count, sum, mean, min, max, variance, and standard
//! deviation over a stream in a single pass with constant memory, without
//! retaining the values. Partial results computed on different workers merge
//! into exactly the statistics of the combined stream.
//!
//! ## Features
//!
//! - **Running Statistics**: Welford's numerically stable online algorithm
//! - **Full Mergeability**: Chan et al.'s combination rule, order-insensitive
//! - **Grouped Statistics**: one independent accumulator per dense group id,
//!   fed from parallel id/value slices
//! - **Two Export Shapes**: row-wise snapshots with explicit absence, or
//!   index-aligned columns with NaN for empty groups
//!
//! ## Quick Start
//!
//! ```rust
//! use flowmoments::prelude::*;
//!
//! let mut stats = RunningStats::new();
//! stats.add_all(&[1.0, 2.0, 3.0, 4.0, 5.0]);
//!
//! let summary = stats.summary();
//! assert_eq!(summary.count, 5);
//! assert_eq!(summary.mean(), Some(3.0));
//! assert_eq!(summary.variance(), Some(2.0));
//! ```
//!
//! ## Distributed Computing
//!
//! All accumulators implement the [`Sketch`](traits::Sketch) trait which
//! includes a `merge` operation, allowing partial results to be combined
//! across workers:
//!
//! ```rust
//! use flowmoments::grouped::{GroupedSketch, GroupedStats};
//! use flowmoments::traits::Sketch;
//!
//! let mut worker1 = GroupedStats::new(4).unwrap();
//! let mut worker2 = GroupedStats::new(4).unwrap();
//!
//! // Each worker processes its partition
//! worker1.add_batch(&[0, 1, 3], &[1.0, 2.0, 3.0]).unwrap();
//! worker2.add_batch(&[3, 3], &[4.0, 5.0]).unwrap();
//!
//! // Merge results
//! worker1.merge(&worker2).unwrap();
//! assert_eq!(worker1.summary(3).unwrap().mean(), Some(4.0));
//! ```
//!
//! ## Feature Flags
//!
//! Algorithm families:
//! - `statistics` (default): running moments
//! - `grouped` (default): statistics partitioned by group id
//! - `full`: Enable all algorithm families
//!
//! Platform features:
//! - `std` (default): Standard library support
//! - `serde`: Enable serialization

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core traits always available
pub mod traits;

#[cfg_attr(not(feature = "statistics"), allow(dead_code))]
mod math;

#[cfg(feature = "statistics")]
#[cfg_attr(docsrs, doc(cfg(feature = "statistics")))]
pub mod statistics;

#[cfg(feature = "grouped")]
#[cfg_attr(docsrs, doc(cfg(feature = "grouped")))]
pub mod grouped;

pub mod prelude {
    pub use crate::traits::*;

    #[cfg(feature = "statistics")]
    pub use crate::statistics::{ColumnarSummary, Moments, RunningStats, Summary};

    #[cfg(feature = "grouped")]
    pub use crate::grouped::{GroupId, GroupedSketch, GroupedStats, PackedGroupedStats};
}

#[cfg(feature = "statistics")]
pub use statistics::RunningStats;

#[cfg(feature = "grouped")]
pub use grouped::{GroupedStats, PackedGroupedStats};
