//! One extraction run, from sample file to byte sink.
//!
//! Samples are read once into a [`SampleBuffer`]; statistics and
//! extraction each take their own cursor over it. Output is written only
//! after every stage has succeeded, so a failed run leaves no file.

use crate::analysis::{Statistics, StatisticsError};
use crate::config::{ConfigError, RunConfig};
use crate::extraction::{extract, extract_valid, Bitstream};
use crate::source::{LineSamples, SampleBuffer, SampleError};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The sample source could not be read or held a malformed sample.
    #[error(transparent)]
    Sample(#[from] SampleError),
    /// Statistics were requested over an empty input, or could not be rendered.
    #[error(transparent)]
    Statistics(#[from] StatisticsError),
    /// The run configuration is incomplete or inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The packed bytes could not be written to the sink.
    #[error("failed to write output: {0}")]
    Sink(#[source] io::Error),
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Input statistics, if requested.
    pub statistics: Option<Statistics>,
    /// The bits written to the sink.
    pub bitstream: Bitstream,
}

/// Drives a single run described by a [`RunConfig`].
pub struct Pipeline {
    config: RunConfig,
}

impl Pipeline {
    /// Creates a pipeline for one run.
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Reads, analyzes and extracts without touching the sink.
    pub fn process(&self) -> Result<RunReport, PipelineError> {
        self.config.validate()?;

        // Without statistics there is no second consumer, so stream the
        // file straight through the extractor.
        if !self.config.statistics {
            let source = LineSamples::open(&self.config.input)?;
            let bitstream = extract(source, self.config.policy)?;
            log_bitstream(&bitstream);
            return Ok(RunReport {
                statistics: None,
                bitstream,
            });
        }

        let samples = SampleBuffer::collect(LineSamples::open(&self.config.input)?)?;
        tracing::info!(
            input = %self.config.input.display(),
            samples = samples.len(),
            "Read delay samples"
        );

        process_samples(&samples, &self.config)
    }

    /// Runs to completion and writes the packed bytes to the sink.
    pub fn run(&self) -> Result<RunReport, PipelineError> {
        let report = self.process()?;

        write_sink(&self.config.output, report.bitstream.data()).map_err(PipelineError::Sink)?;

        tracing::info!(
            output = %self.config.output.display(),
            bytes = report.bitstream.len(),
            "Wrote bitstream"
        );

        Ok(report)
    }
}

/// Runs statistics and extraction over already materialized samples.
pub fn process_samples(
    samples: &SampleBuffer,
    config: &RunConfig,
) -> Result<RunReport, PipelineError> {
    let statistics = if config.statistics {
        Some(Statistics::compute(samples.as_slice())?)
    } else {
        None
    };

    let bitstream = extract_valid(samples.iter(), config.policy);
    log_bitstream(&bitstream);

    Ok(RunReport {
        statistics,
        bitstream,
    })
}

/// Writes `data` to a temporary file beside `path`, then renames it into
/// place. A failed write leaves `path` untouched and removes the temporary.
fn write_sink(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn log_bitstream(bitstream: &Bitstream) {
    tracing::info!(
        policy = %bitstream.policy(),
        samples = bitstream.samples_consumed(),
        bits = bitstream.bits_emitted(),
        bytes = bitstream.len(),
        dropped_bits = bitstream.dropped_bits(),
        unpaired_discarded = bitstream.unpaired_discarded(),
        bias = bitstream.bit_bias(),
        "Extracted bitstream"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionPolicy;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_process_samples_with_statistics() {
        let samples = SampleBuffer::from((1..=17).collect::<Vec<_>>());
        let config = RunConfig::new("in.txt", "out.dat");

        let report = process_samples(&samples, &config).unwrap();
        let stats = report.statistics.unwrap();
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 17);
        assert_eq!(report.bitstream.bits_emitted(), 16);
        assert_eq!(report.bitstream.data(), &[0xAA, 0xAA]);
    }

    #[test]
    fn test_empty_samples_need_statistics_disabled() {
        let samples = SampleBuffer::default();

        let config = RunConfig::new("in.txt", "out.dat");
        assert!(matches!(
            process_samples(&samples, &config),
            Err(PipelineError::Statistics(StatisticsError::EmptyInput))
        ));

        let config = config.with_statistics(false);
        let report = process_samples(&samples, &config).unwrap();
        assert!(report.statistics.is_none());
        assert!(report.bitstream.is_empty());
    }

    #[test]
    fn test_policy_is_honored() {
        let samples = SampleBuffer::from((1..=17).collect::<Vec<_>>());
        let config = RunConfig::new("in.txt", "out.dat")
            .with_policy(ExtractionPolicy::PairedVonNeumann)
            .with_statistics(false);

        let report = process_samples(&samples, &config).unwrap();
        assert_eq!(report.bitstream.policy(), ExtractionPolicy::PairedVonNeumann);
        assert_eq!(report.bitstream.bits_emitted(), 8);
        assert_eq!(report.bitstream.data(), &[0xFF]);
    }

    #[test]
    fn test_write_sink_replaces_existing_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rand.dat");
        std::fs::write(&path, b"previous run").unwrap();

        write_sink(&path, &[0x0D, 0xAA]).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x0D, 0xAA]);
        assert_eq!(entries(dir.path()), 1);
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        // A directory in the way makes the final rename fail
        let path = dir.path().join("rand.dat");
        std::fs::create_dir(&path).unwrap();

        assert!(write_sink(&path, &[0xFF; 64]).is_err());
        assert!(path.is_dir());
        assert_eq!(entries(dir.path()), 1);
    }
}
