//! Input statistics.
//!
//! Summary statistics and a histogram over the raw delays, used to
//! sanity-check a capture before its bits are trusted. These are
//! read-only observations, not entropy estimates.

mod histogram;
mod statistics;

pub use histogram::{Bucket, Histogram, HISTOGRAM_BUCKETS};
pub use statistics::{RunningMean, Statistics, StatisticsError};
