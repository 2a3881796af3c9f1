//! Delay Entropy CLI
//!
//! Command-line interface for extracting a bitstream from a file of raw
//! delays and for inspecting the delays' statistics.

use clap::{Parser, Subcommand, ValueEnum};
use delay_entropy::{
    analysis::Statistics,
    config::{FileConfig, RunConfig},
    extraction::ExtractionPolicy,
    pipeline::{Pipeline, PipelineError},
    source::{LineSamples, SampleBuffer},
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "delay-entropy", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a packed bitstream from a delay file.
    Extract {
        /// Text file with one delay per line.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// File receiving the packed bytes.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Extraction policy.
        #[arg(short, long, value_enum)]
        policy: Option<ExtractionPolicy>,
        /// Skip the statistics pass.
        #[arg(long)]
        no_stats: bool,
    },
    /// Print statistics for a delay file.
    Stats {
        /// Text file with one delay per line.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Include occupied histogram buckets.
        #[arg(long)]
        histogram: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Human-readable lines.
    Text,
    /// A TOML document.
    Toml,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let file = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    match cli.command {
        Command::Extract {
            input,
            output,
            policy,
            no_stats,
        } => {
            let mut file = file;
            if input.is_some() {
                file.input.path = input;
            }
            if output.is_some() {
                file.output.path = output;
            }
            if let Some(policy) = policy {
                file.extraction.policy = policy;
            }
            let histogram = file.output.histogram;
            let config = file.into_run_config()?;
            let config = RunConfig {
                statistics: config.statistics && !no_stats,
                ..config
            };

            info!("Delay Entropy v{}", delay_entropy::VERSION);
            let report = Pipeline::new(config).run()?;

            if let Some(stats) = &report.statistics {
                print_text(stats, histogram);
            }
            info!(
                "Done. {} bytes from {} samples",
                report.bitstream.len(),
                report.bitstream.samples_consumed()
            );
        }
        Command::Stats {
            input,
            histogram,
            format,
        } => {
            let input = input
                .or(file.input.path)
                .ok_or(delay_entropy::ConfigError::MissingInput)?;
            let samples = SampleBuffer::collect(LineSamples::open(&input)?)?;
            let stats = Statistics::compute(samples.as_slice())?;

            match format {
                Format::Text => print_text(&stats, histogram || file.output.histogram),
                Format::Toml => {
                    print!("{}", stats.to_toml(histogram || file.output.histogram)?)
                }
            }
        }
    }

    Ok(())
}

fn print_text(stats: &Statistics, histogram: bool) {
    println!("{}", stats);
    if histogram {
        print!("{}", stats.histogram);
    }
}
