//! Stimulus sequence command

use std::path::{Path, PathBuf};

use clap::Args;
use pixspike_core::ImageEncoder;
use tracing::{info, warn};

use super::{collect_images, EncoderArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::loader::load_intensity_grid;
use crate::output::{file_stem, OutputFormat, SpikeArrayFile};
use crate::raster::render_raster;

/// Encode a directory of PNGs as one stimulus sequence
///
/// Images are presented in file-name order, each for the ON duration
/// followed by the OFF duration.
#[derive(Args, Debug)]
pub struct SequenceCommand {
    /// Directory of PNG images
    pub input: PathBuf,

    /// Output spike array file
    #[arg(short, long)]
    pub out: PathBuf,

    #[command(flatten)]
    pub encoder: EncoderArgs,

    /// Spike array format (defaults to the output extension, then the config)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also write a raster plot to this SVG file
    #[arg(long)]
    pub plot: Option<PathBuf>,
}

impl SequenceCommand {
    pub fn execute(self, config_path: Option<&Path>) -> CliResult<()> {
        let config = CliConfig::resolve(config_path)?;
        let encoder_config = config.encoder.to_encoder_config(&self.encoder.overrides())?;
        let sigma = self.encoder.sigma(&config)?;
        let format = self
            .format
            .or_else(|| OutputFormat::from_path(&self.out))
            .unwrap_or(config.output.format);

        let images = collect_images(&self.input)?;
        let grids = images
            .iter()
            .map(|path| load_intensity_grid(path, sigma))
            .collect::<CliResult<Vec<_>>>()?;
        info!(
            "Sequencing {} image(s) from {}",
            grids.len(),
            self.input.display()
        );

        let encoder = ImageEncoder::new(encoder_config)?;
        let collection = encoder.encode_sequence(&grids)?;
        info!(
            "{} spikes over {} ms ({} stimuli)",
            collection.total_spikes(),
            collection.duration_ms(),
            collection.stimulus_count()
        );

        let sources = images
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        SpikeArrayFile::from_collection(sources, &collection, encoder.config())
            .write(&self.out, format)?;
        info!("Spike array saved to {}", self.out.display());

        if let Some(plot) = &self.plot {
            let title = format!("Raster plot of {}", file_stem(&self.input));
            match render_raster(&collection, plot, &title) {
                Ok(()) => info!("Raster plot saved to {}", plot.display()),
                Err(e) => warn!("Raster plot failed: {}", e),
            }
        }
        Ok(())
    }
}
