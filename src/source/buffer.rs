//! Materialized sample sequence.

use super::{Delay, SampleError};

/// An immutable, ordered sequence of delays read from a source.
///
/// Sources are single-pass, so callers that need both statistics and
/// extraction over the same data collect the samples once and take an
/// independent cursor per consumer.
#[derive(Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<Delay>,
}

impl SampleBuffer {
    /// Collects every sample from `source`.
    ///
    /// Fails on the first invalid sample; no partial buffer is returned.
    pub fn collect<I>(source: I) -> Result<Self, SampleError>
    where
        I: IntoIterator<Item = Result<Delay, SampleError>>,
    {
        let samples = source.into_iter().collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(samples = samples.len(), "Materialized sample buffer");
        Ok(Self { samples })
    }

    /// Returns a fresh cursor over the samples in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = Delay> + '_ {
        self.samples.iter().copied()
    }

    /// Returns the samples as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Delay] {
        &self.samples
    }

    /// Returns the number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if no samples were read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<Delay>> for SampleBuffer {
    fn from(samples: Vec<Delay>) -> Self {
        Self { samples }
    }
}

impl std::fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("samples", &self.samples.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_preserves_order() {
        let buffer = SampleBuffer::collect(vec![Ok(3), Ok(1), Ok(2)]).unwrap();
        assert_eq!(buffer.as_slice(), &[3, 1, 2]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_collect_is_all_or_nothing() {
        let source = vec![
            Ok(1),
            Err(SampleError::InvalidSample {
                line: 2,
                content: "x".into(),
            }),
            Ok(3),
        ];
        assert!(SampleBuffer::collect(source).is_err());
    }

    #[test]
    fn test_independent_cursors() {
        let buffer = SampleBuffer::from(vec![10, 20, 30]);

        let mut first = buffer.iter();
        assert_eq!(first.next(), Some(10));

        // A second cursor starts from the beginning
        let second: Vec<Delay> = buffer.iter().collect();
        assert_eq!(second, vec![10, 20, 30]);
        assert_eq!(first.next(), Some(20));
    }
}
