//! Statistical summaries for streaming data
//!
//! This module provides algorithms for computing statistics over streams
//! in a single pass with constant memory.
//!
//! # Example
//!
//! ```
//! use flowmoments::statistics::RunningStats;
//!
//! let mut stats = RunningStats::new();
//!
//! for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     stats.add(value);
//! }
//!
//! let summary = stats.summary();
//! println!("Count: {}", summary.count);
//! println!("Mean: {:?}", summary.mean());
//! println!("Stddev: {:?}", summary.stddev());
//! println!("Min: {:?}", summary.min());
//! println!("Max: {:?}", summary.max());
//! ```

mod moments;
mod summary;

#[cfg_attr(not(feature = "grouped"), allow(unused_imports))]
pub(crate) use moments::{chan_combine, clamped_variance, finish, welford_step};
pub use moments::RunningStats;
pub use summary::{ColumnarSummary, Moments, Summary};
