//! Paired von Neumann comparison.
//!
//! Delays are consumed two at a time and each pair yields one bit,
//! `d1 > d0`. Any bias common to both draws cancels out, at the cost of
//! half the throughput. Equal pairs yield `false`.

use crate::source::Delay;

/// State of the paired extractor.
///
/// `pending` holds the first delay of a pair while waiting for the second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairedState {
    pending: Option<Delay>,
}

impl PairedState {
    /// Creates a state awaiting the first delay of a pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the state by one delay.
    ///
    /// Returns a bit only when `delay` completes a pair.
    pub fn step(self, delay: Delay) -> (Option<bool>, Self) {
        match self.pending {
            None => (
                None,
                Self {
                    pending: Some(delay),
                },
            ),
            Some(first) => (Some(delay > first), Self { pending: None }),
        }
    }

    /// Returns true while the first half of a pair is buffered.
    #[inline]
    pub fn is_awaiting_second(&self) -> bool {
        self.pending.is_some()
    }
}
