//! Fixed-bucket histogram of raw delays.

use crate::source::Delay;
use serde::Serialize;

/// Number of equal-width buckets spanning `[0, max]`.
pub const HISTOGRAM_BUCKETS: usize = 512;

/// One histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    /// Inclusive lower bound.
    pub start: f64,
    /// Upper bound, exclusive except for the last bucket.
    pub end: f64,
    /// Samples falling in the bucket.
    pub count: u64,
}

/// Histogram over `[0, max]` with [`HISTOGRAM_BUCKETS`] buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    buckets: Vec<Bucket>,
}

impl Histogram {
    /// Builds the histogram for `samples`, whose maximum is `max`.
    ///
    /// A sample equal to `max` lands in the last bucket. When `max` is
    /// zero every bucket is degenerate and all samples land in the first.
    pub fn build(samples: &[Delay], max: Delay) -> Self {
        let mut counts = vec![0u64; HISTOGRAM_BUCKETS];
        for &sample in samples {
            counts[Self::bucket_index(sample, max)] += 1;
        }

        let width = max as f64 / HISTOGRAM_BUCKETS as f64;
        let buckets = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bucket {
                start: i as f64 * width,
                end: if i + 1 == HISTOGRAM_BUCKETS {
                    max as f64
                } else {
                    (i + 1) as f64 * width
                },
                count,
            })
            .collect();

        Self { buckets }
    }

    /// Returns the bucket a sample belongs to.
    ///
    /// Computed in integer arithmetic so bucket edges are exact.
    pub fn bucket_index(sample: Delay, max: Delay) -> usize {
        if max == 0 {
            return 0;
        }
        let scaled = sample as u128 * HISTOGRAM_BUCKETS as u128 / max as u128;
        (scaled as usize).min(HISTOGRAM_BUCKETS - 1)
    }

    /// Returns the buckets in ascending order.
    #[inline]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Buckets holding at least one sample.
    pub fn occupied(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter().filter(|b| b.count > 0)
    }
}

impl std::fmt::Display for Histogram {
    /// Prints occupied buckets one per line; the last bucket is closed.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, bucket) in self.buckets.iter().enumerate() {
            if bucket.count == 0 {
                continue;
            }
            let close = if i + 1 == HISTOGRAM_BUCKETS { ']' } else { ')' };
            writeln!(
                f,
                "[{:>12.3}, {:>12.3}{} {:>8}",
                bucket.start, bucket.end, close, bucket.count
            )?;
        }
        Ok(())
    }
}
