//! Sequential comparison of each delay with its predecessor.
//!
//! Both variants emit one bit per delay after the first. The first delay
//! only seeds the comparison.

use crate::source::Delay;

/// State of the whitened sequential extractor.
///
/// The comparison outcome is XORed with a bit that flips on every
/// emitted bit, spreading trend or alternation bias over both values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhitenedState {
    previous: Option<Delay>,
    whitening: bool,
}

impl WhitenedState {
    /// Creates an unseeded state with the whitening bit cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the state by one delay.
    pub fn step(self, delay: Delay) -> (Option<bool>, Self) {
        let Some(previous) = self.previous else {
            return (
                None,
                Self {
                    previous: Some(delay),
                    whitening: self.whitening,
                },
            );
        };

        let bit = if delay > previous {
            self.whitening
        } else {
            !self.whitening
        };

        (
            Some(bit),
            Self {
                previous: Some(delay),
                whitening: !self.whitening,
            },
        )
    }

    /// Returns true once the first delay has been seen.
    #[inline]
    pub fn is_seeded(&self) -> bool {
        self.previous.is_some()
    }

    /// Returns the current whitening bit.
    #[inline]
    pub fn whitening_bit(&self) -> bool {
        self.whitening
    }
}

/// State of the naive sequential extractor.
///
/// Emits `delay > previous` directly. The output keeps whatever order
/// bias the raw stream has; it exists for comparison against the
/// whitened variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaiveState {
    previous: Option<Delay>,
}

impl NaiveState {
    /// Creates an unseeded state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the state by one delay.
    pub fn step(self, delay: Delay) -> (Option<bool>, Self) {
        let bit = self.previous.map(|previous| delay > previous);
        (
            bit,
            Self {
                previous: Some(delay),
            },
        )
    }

    /// Returns true once the first delay has been seen.
    #[inline]
    pub fn is_seeded(&self) -> bool {
        self.previous.is_some()
    }
}
