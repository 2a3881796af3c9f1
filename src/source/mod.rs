//! Raw delay input.
//!
//! The timing source is treated as a plain sequence of integers. This
//! module reads them from text and materializes them for the later
//! stages; it makes no judgement about their quality.

mod buffer;
mod reader;

pub use buffer::SampleBuffer;
pub use reader::{parse_delay, LineSamples, SampleError};

/// One raw timing measurement (an inter-event interval).
pub type Delay = u64;
