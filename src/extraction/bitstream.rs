//! Packed output of an extraction run.

use super::ExtractionPolicy;

/// Bytes produced by one extraction run, with provenance counters.
///
/// The bytes carry no header or length prefix; consumers treat them as
/// an open-ended bit source.
#[derive(Clone)]
pub struct Bitstream {
    /// Packed bytes, LSB-first.
    data: Vec<u8>,
    /// Policy that produced the bits.
    policy: ExtractionPolicy,
    /// Delays consumed from the source.
    samples_consumed: u64,
    /// Bits emitted by the extractor, including dropped ones.
    bits_emitted: u64,
    /// Trailing bits dropped by the packer.
    dropped_bits: u8,
    /// Whether an unpaired final delay was discarded.
    unpaired_discarded: bool,
}

impl Bitstream {
    pub(crate) fn new(
        data: Vec<u8>,
        policy: ExtractionPolicy,
        samples_consumed: u64,
        bits_emitted: u64,
        dropped_bits: u8,
        unpaired_discarded: bool,
    ) -> Self {
        Self {
            data,
            policy,
            samples_consumed,
            bits_emitted,
            dropped_bits,
            unpaired_discarded,
        }
    }

    /// Returns the packed bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of bits in the packed bytes.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.data.len() * 8
    }

    /// Returns the policy that produced this stream.
    #[inline]
    pub fn policy(&self) -> ExtractionPolicy {
        self.policy
    }

    /// Returns the number of delays consumed.
    #[inline]
    pub fn samples_consumed(&self) -> u64 {
        self.samples_consumed
    }

    /// Returns the number of bits emitted by the extractor.
    #[inline]
    pub fn bits_emitted(&self) -> u64 {
        self.bits_emitted
    }

    /// Returns the number of trailing bits dropped by the packer.
    #[inline]
    pub fn dropped_bits(&self) -> u8 {
        self.dropped_bits
    }

    /// Returns true if the paired policy discarded an unpaired final delay.
    #[inline]
    pub fn unpaired_discarded(&self) -> bool {
        self.unpaired_discarded
    }

    /// Counts the number of set bits.
    pub fn popcount(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Calculates bit bias as deviation from 0.5.
    ///
    /// Returns a value in [-0.5, 0.5] where 0.0 is unbiased. This is a
    /// logging aid, not an entropy estimate.
    pub fn bit_bias(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let ones = self.popcount() as f64;
        let total = self.bit_count() as f64;
        (ones / total) - 0.5
    }
}

impl std::fmt::Debug for Bitstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitstream")
            .field("policy", &self.policy)
            .field("bytes", &self.data.len())
            .field("samples_consumed", &self.samples_consumed)
            .field("bits_emitted", &self.bits_emitted)
            .field("dropped_bits", &self.dropped_bits)
            .field("unpaired_discarded", &self.unpaired_discarded)
            .field("bit_bias", &format!("{:.4}", self.bit_bias()))
            .finish()
    }
}
