//! Delay Entropy Library
//!
//! Turns a sequence of raw timing measurements (inter-event delays from
//! a noisy physical process) into a packed bitstream. Raw jitter is
//! biased and autocorrelated, so bits are derived by comparing delays
//! with a debiasing extractor rather than taken from their values.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! source → extraction (extractor → packer) → sink
//!    ↓
//! analysis (statistics, histogram)
//! ```
//!
//! # Design Principles
//!
//! - **Single pass**: extractor state is strictly sequential and owned by one run
//! - **All or nothing**: a malformed sample aborts the run and discards its output
//! - **Defined bit order**: LSB-first, trailing partial byte dropped
//! - **No cryptographic claims**: statistics are sanity checks on the input, not proofs
//!
//! # Example
//!
//! ```
//! use delay_entropy::{
//!     analysis::Statistics,
//!     extraction::{extract, ExtractionPolicy},
//!     source::LineSamples,
//! };
//! use std::io::Cursor;
//!
//! let text = "5\n5\n10\n3\n3\n8\n1\n9\n4\n";
//! let samples: Vec<u64> = LineSamples::new(Cursor::new(text))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! let stats = Statistics::compute(&samples).unwrap();
//! assert_eq!(stats.max, 10);
//!
//! let bits = extract(samples.iter().map(|&d| Ok(d)), ExtractionPolicy::WhitenedSequential)
//!     .unwrap();
//! assert_eq!(bits.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod extraction;
pub mod pipeline;
pub mod source;

// Re-export commonly used types at crate root
pub use analysis::{Histogram, Statistics, StatisticsError};
pub use config::{ConfigError, FileConfig, RunConfig};
pub use extraction::{extract, Bitstream, BitPacker, ExtractionPolicy, Extractor};
pub use pipeline::{Pipeline, PipelineError, RunReport};
pub use source::{Delay, LineSamples, SampleBuffer, SampleError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
