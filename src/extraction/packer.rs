//! LSB-first bit packing.
//!
//! The k-th bit received lands at position `k mod 8` of the current byte.
//! Every eighth bit completes a byte. A trailing partial byte at end of
//! stream is dropped, never padded, so the output matches existing
//! consumers of the byte format bit for bit.

/// A byte under construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteAccumulator {
    value: u8,
    /// Bits written into `value`, always in `0..8`.
    count: u8,
}

impl ByteAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one bit, returning the byte once it is complete.
    #[inline]
    pub fn push(&mut self, bit: bool) -> Option<u8> {
        self.value |= (bit as u8) << self.count;
        self.count += 1;

        if self.count == 8 {
            let byte = self.value;
            *self = Self::default();
            Some(byte)
        } else {
            None
        }
    }

    /// Number of bits held in the partial byte.
    #[inline]
    pub fn pending_bits(&self) -> u8 {
        self.count
    }
}

/// Packs a stream of bits into bytes.
#[derive(Debug, Default)]
pub struct BitPacker {
    accumulator: ByteAccumulator,
    bytes: Vec<u8>,
    bits_received: u64,
}

impl BitPacker {
    /// Creates an empty packer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a packer with room for `bits` bits of output.
    pub fn with_capacity(bits: u64) -> Self {
        Self {
            bytes: Vec::with_capacity((bits / 8) as usize),
            ..Self::default()
        }
    }

    /// Appends one bit.
    #[inline]
    pub fn push(&mut self, bit: bool) {
        self.bits_received += 1;
        if let Some(byte) = self.accumulator.push(bit) {
            self.bytes.push(byte);
        }
    }

    /// Total bits received so far.
    #[inline]
    pub fn bits_received(&self) -> u64 {
        self.bits_received
    }

    /// Ends the stream.
    ///
    /// Returns the completed bytes and the number of trailing bits that
    /// were dropped because they did not fill a byte.
    pub fn finish(self) -> (Vec<u8>, u8) {
        let dropped = self.accumulator.pending_bits();
        if dropped > 0 {
            tracing::debug!(dropped_bits = dropped, "Dropped incomplete trailing byte");
        }
        (self.bytes, dropped)
    }
}

impl Extend<bool> for BitPacker {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

/// Packs `bits` LSB-first, discarding any incomplete trailing byte.
pub fn pack_bits<I: IntoIterator<Item = bool>>(bits: I) -> Vec<u8> {
    let mut packer = BitPacker::new();
    packer.extend(bits);
    packer.finish().0
}
