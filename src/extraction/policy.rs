//! Extraction policies and their state machines.

use super::paired::PairedState;
use super::sequential::{NaiveState, WhitenedState};
use crate::source::Delay;
use serde::{Deserialize, Serialize};

/// Selects how delays are turned into bits.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionPolicy {
    /// One bit per pair of delays, `d1 > d0`.
    PairedVonNeumann,
    /// One bit per delay after the first, comparison XOR a toggling bit.
    #[default]
    WhitenedSequential,
    /// One bit per delay after the first, plain comparison. Inspection only.
    NaiveSequential,
}

impl ExtractionPolicy {
    /// All policies, in declaration order.
    pub const ALL: [ExtractionPolicy; 3] = [
        ExtractionPolicy::PairedVonNeumann,
        ExtractionPolicy::WhitenedSequential,
        ExtractionPolicy::NaiveSequential,
    ];

    /// Returns the configuration name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionPolicy::PairedVonNeumann => "paired-von-neumann",
            ExtractionPolicy::WhitenedSequential => "whitened-sequential",
            ExtractionPolicy::NaiveSequential => "naive-sequential",
        }
    }

    /// Number of bits a run over `samples` delays will emit.
    pub fn expected_bits(&self, samples: u64) -> u64 {
        match self {
            ExtractionPolicy::PairedVonNeumann => samples / 2,
            ExtractionPolicy::WhitenedSequential | ExtractionPolicy::NaiveSequential => {
                samples.saturating_sub(1)
            }
        }
    }
}

impl std::fmt::Display for ExtractionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Extractor state, tagged by policy.
///
/// Each variant carries exactly the state its policy needs. `step` is a
/// pure transition: the same state and delay always give the same bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorState {
    /// Paired von Neumann state.
    PairedVonNeumann(PairedState),
    /// Whitened sequential state.
    WhitenedSequential(WhitenedState),
    /// Naive sequential state.
    NaiveSequential(NaiveState),
}

impl ExtractorState {
    /// Returns the initial state for `policy`.
    pub fn new(policy: ExtractionPolicy) -> Self {
        match policy {
            ExtractionPolicy::PairedVonNeumann => Self::PairedVonNeumann(PairedState::new()),
            ExtractionPolicy::WhitenedSequential => {
                Self::WhitenedSequential(WhitenedState::new())
            }
            ExtractionPolicy::NaiveSequential => Self::NaiveSequential(NaiveState::new()),
        }
    }

    /// Advances by one delay, returning the emitted bit (if any) and the
    /// next state.
    pub fn step(self, delay: Delay) -> (Option<bool>, Self) {
        match self {
            Self::PairedVonNeumann(state) => {
                let (bit, next) = state.step(delay);
                (bit, Self::PairedVonNeumann(next))
            }
            Self::WhitenedSequential(state) => {
                let (bit, next) = state.step(delay);
                (bit, Self::WhitenedSequential(next))
            }
            Self::NaiveSequential(state) => {
                let (bit, next) = state.step(delay);
                (bit, Self::NaiveSequential(next))
            }
        }
    }

    /// Returns the policy this state belongs to.
    pub fn policy(&self) -> ExtractionPolicy {
        match self {
            Self::PairedVonNeumann(_) => ExtractionPolicy::PairedVonNeumann,
            Self::WhitenedSequential(_) => ExtractionPolicy::WhitenedSequential,
            Self::NaiveSequential(_) => ExtractionPolicy::NaiveSequential,
        }
    }

    /// Returns true if a delay is buffered.
    ///
    /// For the paired policy this is the unpaired first half; for the
    /// sequential policies it is the seed of the next comparison. Either
    /// way it is discarded at end of stream without emitting a bit.
    pub fn is_primed(&self) -> bool {
        match self {
            Self::PairedVonNeumann(state) => state.is_awaiting_second(),
            Self::WhitenedSequential(state) => state.is_seeded(),
            Self::NaiveSequential(state) => state.is_seeded(),
        }
    }
}
