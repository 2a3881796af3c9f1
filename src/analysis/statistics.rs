//! Summary statistics over raw delays.
//!
//! A sanity check on the input before extraction: it does not influence
//! the bits produced and is independent of sample order.

use super::histogram::{Bucket, Histogram};
use crate::source::Delay;
use serde::Serialize;
use thiserror::Error;

/// Errors from the statistics reporter.
#[derive(Debug, Clone, Error)]
pub enum StatisticsError {
    /// No samples were given.
    #[error("cannot compute statistics over zero samples")]
    EmptyInput,
    /// The record could not be rendered in the requested format.
    #[error("failed to render statistics: {0}")]
    Render(String),
}

/// Running arithmetic mean using Welford's update.
///
/// Avoids accumulating a raw sum, which would lose precision for long
/// runs of large delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningMean {
    count: u64,
    mean: f64,
}

impl RunningMean {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one value into the mean.
    #[inline]
    pub fn update(&mut self, x: f64) {
        self.count += 1;
        self.mean += (x - self.mean) / self.count as f64;
    }

    /// Number of values folded in.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Current mean, or `None` before the first value.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }
}

/// Statistics record for one run.
#[derive(Debug, Clone)]
pub struct Statistics {
    /// Smallest delay.
    pub min: Delay,
    /// Largest delay.
    pub max: Delay,
    /// Middle value, or the average of the two middle values.
    pub median: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Number of samples.
    pub count: usize,
    /// Histogram over `[0, max]`.
    pub histogram: Histogram,
}

impl Statistics {
    /// Computes the statistics record over `samples`.
    pub fn compute(samples: &[Delay]) -> Result<Self, StatisticsError> {
        let (&first, _) = samples.split_first().ok_or(StatisticsError::EmptyInput)?;

        let mut min = first;
        let mut max = first;
        let mut mean = RunningMean::new();
        for &sample in samples {
            min = min.min(sample);
            max = max.max(sample);
            mean.update(sample as f64);
        }

        let stats = Self {
            min,
            max,
            median: Self::median(samples),
            mean: mean.mean().unwrap_or_default(),
            count: samples.len(),
            histogram: Histogram::build(samples, max),
        };

        tracing::debug!(
            count = stats.count,
            min = stats.min,
            max = stats.max,
            median = stats.median,
            mean = stats.mean,
            "Computed sample statistics"
        );

        Ok(stats)
    }

    /// Renders the record as TOML.
    ///
    /// Scalars only, unless `histogram` is set, in which case the occupied
    /// buckets follow as `[[buckets]]` tables. TOML integers are signed,
    /// so delays above `i64::MAX` fail to render.
    pub fn to_toml(&self, histogram: bool) -> Result<String, StatisticsError> {
        let report = TomlReport {
            min: self.min,
            max: self.max,
            median: self.median,
            mean: self.mean,
            count: self.count,
            buckets: if histogram {
                self.histogram.occupied().collect()
            } else {
                Vec::new()
            },
        };
        toml::to_string(&report).map_err(|e| StatisticsError::Render(e.to_string()))
    }

    /// Median of a non-empty slice.
    fn median(samples: &[Delay]) -> f64 {
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            sorted[mid] as f64
        } else {
            (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
        }
    }
}

#[derive(Serialize)]
struct TomlReport<'a> {
    min: Delay,
    max: Delay,
    median: f64,
    mean: f64,
    count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    buckets: Vec<&'a Bucket>,
}

impl std::fmt::Display for Statistics {
    /// Prints min, max, median and mean, one per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "min:    {}", self.min)?;
        writeln!(f, "max:    {}", self.max)?;
        writeln!(f, "median: {}", self.median)?;
        write!(f, "mean:   {:.3}", self.mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::HISTOGRAM_BUCKETS;

    #[test]
    fn test_simple_sequence() {
        let stats = Statistics::compute(&[1, 2, 3, 4, 5]).unwrap();

        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 5);
        assert_eq!(stats.median, 3.0);
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert_eq!(stats.histogram.buckets().len(), HISTOGRAM_BUCKETS);
        assert_eq!(stats.histogram.total(), 5);
        assert_eq!(stats.histogram.buckets()[HISTOGRAM_BUCKETS - 1].count, 1);
    }

    #[test]
    fn test_even_length_median() {
        let stats = Statistics::compute(&[10, 2, 4, 8]).unwrap();
        assert_eq!(stats.median, 6.0);
    }

    #[test]
    fn test_order_independent() {
        let a = Statistics::compute(&[9, 1, 5, 3]).unwrap();
        let b = Statistics::compute(&[1, 3, 5, 9]).unwrap();

        assert_eq!(a.min, b.min);
        assert_eq!(a.max, b.max);
        assert_eq!(a.median, b.median);
        assert!((a.mean - b.mean).abs() < 1e-12);
        assert_eq!(a.histogram, b.histogram);
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            Statistics::compute(&[]),
            Err(StatisticsError::EmptyInput)
        ));
    }

    #[test]
    fn test_single_sample() {
        let stats = Statistics::compute(&[42]).unwrap();
        assert_eq!(stats.min, 42);
        assert_eq!(stats.max, 42);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.mean, 42.0);
    }

    #[test]
    fn test_running_mean_large_values() {
        let mut mean = RunningMean::new();
        assert!(mean.mean().is_none());

        for _ in 0..1000 {
            mean.update(1e15);
            mean.update(1e15 + 2.0);
        }
        assert_eq!(mean.count(), 2000);
        assert!((mean.mean().unwrap() - (1e15 + 1.0)).abs() < 1e-3);
    }

    #[test]
    fn test_display_lists_four_values() {
        let stats = Statistics::compute(&[1, 2, 3, 4, 5]).unwrap();
        let text = stats.to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("median: 3"));
        assert!(text.contains("mean:   3.000"));
    }

    #[test]
    fn test_toml_scalars_only_by_default() {
        let stats = Statistics::compute(&[1, 2, 3, 4, 5]).unwrap();
        let text = stats.to_toml(false).unwrap();

        assert!(text.contains("min = 1"));
        assert!(text.contains("max = 5"));
        assert!(text.contains("median = 3.0"));
        assert!(!text.contains("buckets"));
    }

    #[test]
    fn test_toml_histogram_lists_occupied_buckets() {
        let stats = Statistics::compute(&[1, 2, 3, 4, 5, 5]).unwrap();
        let text = stats.to_toml(true).unwrap();

        assert_eq!(text.matches("[[buckets]]").count(), 5);
        assert!(text.contains("count = 2"));
    }

    #[test]
    fn test_toml_rejects_out_of_range_delay() {
        let stats = Statistics::compute(&[1, u64::MAX]).unwrap();
        assert!(matches!(
            stats.to_toml(false),
            Err(StatisticsError::Render(_))
        ));
    }
}
