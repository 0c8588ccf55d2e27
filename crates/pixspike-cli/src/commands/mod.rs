//! CLI command implementations for pixspike

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use walkdir::WalkDir;

use crate::config::{CliConfig, EncoderOverrides};
use crate::error::{CliError, CliResult};

pub mod encode;
pub mod init_config;
pub mod inspect;
pub mod raster;
pub mod sequence;

/// pixspike - encode images as Poisson spike trains
#[derive(Parser, Debug)]
#[command(
    name = "pixspike",
    version,
    about = "Encode images as Poisson spike trains",
    long_about = "pixspike converts grayscale images into one Poisson spike train per pixel, \
                  with firing rate proportional to intensity. Spike arrays are written as JSON \
                  or bincode, optionally with an SVG raster plot."
)]
pub struct PixspikeCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PIXSPIKE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode an image, or every PNG in a directory
    Encode(encode::EncodeCommand),

    /// Encode a directory of PNGs as one stimulus sequence
    #[command(alias = "seq")]
    Sequence(sequence::SequenceCommand),

    /// Render a raster plot from a spike array file
    Raster(raster::RasterCommand),

    /// Summarize a spike array file
    Inspect(inspect::InspectCommand),

    /// Write a default configuration file
    InitConfig(init_config::InitConfigCommand),
}

impl PixspikeCli {
    /// Execute the CLI command
    pub fn execute(self) -> CliResult<()> {
        let config = self.config.as_deref();
        match self.command {
            Commands::Encode(cmd) => cmd.execute(config),
            Commands::Sequence(cmd) => cmd.execute(config),
            Commands::Raster(cmd) => cmd.execute(config),
            Commands::Inspect(cmd) => cmd.execute(),
            Commands::InitConfig(cmd) => cmd.execute(),
        }
    }
}

/// Encoder flags shared by `encode` and `sequence`
#[derive(Args, Debug, Clone, Default)]
pub struct EncoderArgs {
    /// Firing rate of a full-intensity pixel (Hz)
    #[arg(long = "max-freq")]
    pub max_freq: Option<f64>,

    /// Stimulus ON duration (ms)
    #[arg(long)]
    pub on_duration: Option<f64>,

    /// Silent OFF duration between stimuli (ms)
    #[arg(long)]
    pub off_duration: Option<f64>,

    /// Receptive-field Gaussian sigma in pixels (0 disables)
    #[arg(long)]
    pub sigma: Option<f32>,

    /// Seed for reproducible spike trains
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use binned sampling with this bin width (ms)
    #[arg(long)]
    pub bin_ms: Option<f64>,

    /// Encode images larger than the configured neuron limit
    #[arg(long)]
    pub allow_large: bool,
}

impl EncoderArgs {
    /// Command-line overrides for the `[encoder]` section
    pub fn overrides(&self) -> EncoderOverrides {
        EncoderOverrides {
            max_freq_hz: self.max_freq,
            on_duration_ms: self.on_duration,
            off_duration_ms: self.off_duration,
            seed: self.seed,
            bin_ms: self.bin_ms,
            allow_large: self.allow_large,
        }
    }

    /// Effective sigma, rejected up front when negative
    pub fn sigma(&self, config: &CliConfig) -> CliResult<f32> {
        let sigma = self.sigma.unwrap_or(config.encoder.sigma);
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(CliError::invalid_args(format!(
                "--sigma must be a non-negative number, got {}",
                sigma
            )));
        }
        Ok(sigma)
    }
}

/// A single image file, or the PNGs directly inside a directory in name order
pub fn collect_images(input: &Path) -> CliResult<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(CliError::missing_resource(format!(
            "input {}",
            input.display()
        )));
    }

    let images: Vec<PathBuf> = WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();

    if images.is_empty() {
        return Err(CliError::missing_resource(format!(
            "PNG images in {}",
            input.display()
        )));
    }
    Ok(images)
}
