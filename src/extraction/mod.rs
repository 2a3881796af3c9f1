//! Bit extraction and packing.
//!
//! This module turns an ordered sequence of raw delays into a packed
//! bitstream. Raw timing jitter is biased and autocorrelated, so bits
//! are derived by comparing delays rather than taken from their values.
//! Three policies are available, see [`ExtractionPolicy`].

mod bitstream;
mod packer;
mod paired;
mod policy;
mod sequential;

pub use bitstream::Bitstream;
pub use packer::{pack_bits, BitPacker, ByteAccumulator};
pub use paired::PairedState;
pub use policy::{ExtractionPolicy, ExtractorState};
pub use sequential::{NaiveState, WhitenedState};

use crate::source::{Delay, SampleError};

/// Single-pass extractor over a delay stream.
///
/// Owns the state of one run. Delays must be pushed strictly in arrival
/// order.
pub struct Extractor {
    state: ExtractorState,
    samples_consumed: u64,
    bits_emitted: u64,
}

impl Extractor {
    /// Creates an extractor in the initial state of `policy`.
    pub fn new(policy: ExtractionPolicy) -> Self {
        Self {
            state: ExtractorState::new(policy),
            samples_consumed: 0,
            bits_emitted: 0,
        }
    }

    /// Feeds one delay and returns the bit it produced, if any.
    pub fn push(&mut self, delay: Delay) -> Option<bool> {
        let (bit, next) = self.state.step(delay);
        self.state = next;
        self.samples_consumed += 1;

        if let Some(bit) = bit {
            self.bits_emitted += 1;
            tracing::trace!(delay, bit, "Extracted bit");
        }
        bit
    }

    /// Returns the policy in use.
    #[inline]
    pub fn policy(&self) -> ExtractionPolicy {
        self.state.policy()
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> ExtractorState {
        self.state
    }

    /// Returns the number of delays consumed.
    #[inline]
    pub fn samples_consumed(&self) -> u64 {
        self.samples_consumed
    }

    /// Returns the number of bits emitted.
    #[inline]
    pub fn bits_emitted(&self) -> u64 {
        self.bits_emitted
    }

    /// Resets to the initial state of the same policy.
    pub fn reset(&mut self) {
        *self = Self::new(self.policy());
    }

    /// Ends the stream.
    ///
    /// Returns true if the paired policy was holding an unpaired delay,
    /// which is discarded.
    pub fn finish(self) -> bool {
        let unpaired = matches!(self.state, ExtractorState::PairedVonNeumann(s) if s.is_awaiting_second());
        if unpaired {
            tracing::debug!("Discarded unpaired trailing delay");
        }
        unpaired
    }
}

/// Runs one extraction over a fallible delay stream.
///
/// The run is all-or-nothing: on the first invalid sample the bytes
/// packed so far are discarded and the error is returned.
pub fn extract<I>(samples: I, policy: ExtractionPolicy) -> Result<Bitstream, SampleError>
where
    I: IntoIterator<Item = Result<Delay, SampleError>>,
{
    let samples = samples.into_iter();
    let mut extractor = Extractor::new(policy);
    let mut packer = BitPacker::with_capacity(policy.expected_bits(samples.size_hint().0 as u64));

    for sample in samples {
        if let Some(bit) = extractor.push(sample?) {
            packer.push(bit);
        }
    }

    let bitstream = finish_run(extractor, packer);
    tracing::debug!(
        %policy,
        samples = bitstream.samples_consumed(),
        bits = bitstream.bits_emitted(),
        bytes = bitstream.len(),
        "Extraction finished"
    );

    Ok(bitstream)
}

/// Runs one extraction over delays that are already known to be valid.
pub fn extract_valid<I>(samples: I, policy: ExtractionPolicy) -> Bitstream
where
    I: IntoIterator<Item = Delay>,
{
    let samples = samples.into_iter();
    let mut extractor = Extractor::new(policy);
    let mut packer = BitPacker::with_capacity(policy.expected_bits(samples.size_hint().0 as u64));
    packer.extend(samples.filter_map(|d| extractor.push(d)));

    finish_run(extractor, packer)
}

/// Closes both stages of a run, recording what each one dropped.
fn finish_run(extractor: Extractor, packer: BitPacker) -> Bitstream {
    let policy = extractor.policy();
    let samples_consumed = extractor.samples_consumed();
    let bits_emitted = extractor.bits_emitted();
    let unpaired_discarded = extractor.finish();
    let (data, dropped_bits) = packer.finish();

    Bitstream::new(
        data,
        policy,
        samples_consumed,
        bits_emitted,
        dropped_bits,
        unpaired_discarded,
    )
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractionPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(delays: &[Delay]) -> Vec<Result<Delay, SampleError>> {
        delays.iter().map(|&d| Ok(d)).collect()
    }

    #[test]
    fn test_extractor_needs_seed() {
        let mut extractor = Extractor::new(ExtractionPolicy::NaiveSequential);

        // First delay: no output (only seeds the comparison)
        assert!(extractor.push(10).is_none());

        // Second delay: produces a bit
        assert_eq!(extractor.push(20), Some(true));
        assert_eq!(extractor.samples_consumed(), 2);
        assert_eq!(extractor.bits_emitted(), 1);
    }

    #[test]
    fn test_finish_reports_unpaired_delay() {
        let mut extractor = Extractor::new(ExtractionPolicy::PairedVonNeumann);
        extractor.push(1);
        extractor.push(2);
        extractor.push(3);
        assert!(extractor.finish());

        let mut extractor = Extractor::new(ExtractionPolicy::WhitenedSequential);
        extractor.push(1);
        assert!(!extractor.finish());
    }

    #[test]
    fn test_reset_keeps_policy() {
        let mut extractor = Extractor::new(ExtractionPolicy::PairedVonNeumann);
        extractor.push(5);
        extractor.reset();

        assert_eq!(extractor.policy(), ExtractionPolicy::PairedVonNeumann);
        assert_eq!(extractor.samples_consumed(), 0);
        assert!(!extractor.state().is_primed());
    }

    #[test]
    fn test_extract_counts() {
        let delays: Vec<Delay> = (0..21).map(|i| (i * 37) % 11).collect();

        let paired = extract(valid(&delays), ExtractionPolicy::PairedVonNeumann).unwrap();
        assert_eq!(paired.bits_emitted(), 10);
        assert_eq!(paired.len(), 1);
        assert_eq!(paired.dropped_bits(), 2);
        assert!(paired.unpaired_discarded());

        let whitened = extract(valid(&delays), ExtractionPolicy::WhitenedSequential).unwrap();
        assert_eq!(whitened.bits_emitted(), 20);
        assert_eq!(whitened.len(), 2);
        assert_eq!(whitened.dropped_bits(), 4);
        assert!(!whitened.unpaired_discarded());
    }

    #[test]
    fn test_even_paired_run_discards_nothing() {
        let delays: Vec<Delay> = (0..16).collect();
        let stream = extract_valid(delays.iter().copied(), ExtractionPolicy::PairedVonNeumann);

        assert_eq!(stream.data(), &[0xFF]);
        assert_eq!(stream.dropped_bits(), 0);
        assert!(!stream.unpaired_discarded());

        let stream = extract_valid(delays[..15].iter().copied(), ExtractionPolicy::PairedVonNeumann);
        assert!(stream.unpaired_discarded());
        assert_eq!(stream.dropped_bits(), 7);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let delays: Vec<Delay> = (0..200).map(|i| (i * 7919) % 613).collect();
        for policy in ExtractionPolicy::ALL {
            let a = extract(valid(&delays), policy).unwrap();
            let b = extract(valid(&delays), policy).unwrap();
            assert_eq!(a.data(), b.data());
        }
    }

    #[test]
    fn test_invalid_sample_discards_output() {
        let mut samples = valid(&(0..100).collect::<Vec<_>>());
        samples.push(Err(SampleError::InvalidSample {
            line: 101,
            content: "abc".into(),
        }));

        let result = extract(samples, ExtractionPolicy::WhitenedSequential);
        assert!(matches!(
            result,
            Err(SampleError::InvalidSample { line: 101, .. })
        ));
    }

    #[test]
    fn test_whitened_bytes() {
        // Nine delays rising by one: whitened bits alternate 0,1,0,1...
        let delays: Vec<Delay> = (1..=9).collect();
        let stream = extract(valid(&delays), ExtractionPolicy::WhitenedSequential).unwrap();
        assert_eq!(stream.data(), &[0b1010_1010]);

        let naive = extract(valid(&delays), ExtractionPolicy::NaiveSequential).unwrap();
        assert_eq!(naive.data(), &[0xFF]);
    }

    #[test]
    fn test_extract_valid_matches_extract() {
        let delays: Vec<Delay> = (0..64).map(|i| (i * 131) % 97).collect();
        for policy in ExtractionPolicy::ALL {
            let fallible = extract(valid(&delays), policy).unwrap();
            let infallible = extract_valid(delays.iter().copied(), policy);
            assert_eq!(fallible.data(), infallible.data());
            assert_eq!(fallible.bits_emitted(), infallible.bits_emitted());
            assert_eq!(fallible.unpaired_discarded(), infallible.unpaired_discarded());
        }
    }
}
