//! Image encoding command

use std::path::{Path, PathBuf};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use pixspike_core::poisson::derive_seed;
use pixspike_core::{encode_image, EncoderConfig};
use tracing::{debug, info, warn};

use super::{collect_images, EncoderArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::loader::load_intensity_grid;
use crate::output::{file_stem, raster_plot_path, spike_array_path, OutputFormat, SpikeArrayFile};
use crate::raster::render_raster;

/// Encode an image, or every PNG in a directory
#[derive(Args, Debug)]
pub struct EncodeCommand {
    /// Image file or directory of PNG images
    pub input: PathBuf,

    #[command(flatten)]
    pub encoder: EncoderArgs,

    /// Spike array format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Directory for spike arrays
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Directory for raster plots
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,

    /// Skip raster plots
    #[arg(long)]
    pub no_plot: bool,

    /// Skip writing spike arrays
    #[arg(long)]
    pub no_save: bool,
}

/// Resolved output settings for one run
struct OutputPlan {
    spike_dir: PathBuf,
    plot_dir: PathBuf,
    format: OutputFormat,
    save_spikes: bool,
    save_plot: bool,
}

impl EncodeCommand {
    pub fn execute(self, config_path: Option<&Path>) -> CliResult<()> {
        let config = CliConfig::resolve(config_path)?;
        let encoder_config = config.encoder.to_encoder_config(&self.encoder.overrides())?;
        let sigma = self.encoder.sigma(&config)?;
        let plan = OutputPlan {
            spike_dir: self.out_dir.clone().unwrap_or(config.output.spike_dir.clone()),
            plot_dir: self.plot_dir.clone().unwrap_or(config.output.plot_dir.clone()),
            format: self.format.unwrap_or(config.output.format),
            save_spikes: !self.no_save && config.output.save_spikes,
            save_plot: !self.no_plot && config.output.save_plot,
        };

        let images = collect_images(&self.input)?;
        let single = self.input.is_file();
        info!(
            "Encoding {} image(s) at {} Hz, {} ms ON / {} ms OFF",
            images.len(),
            encoder_config.max_freq_hz,
            encoder_config.on_duration_ms,
            encoder_config.off_duration_ms
        );

        let progress = if single {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(images.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .map_err(|e| CliError::Generic(anyhow::anyhow!(e)))?,
            );
            bar
        };

        let mut encoded = 0usize;
        let mut skipped = 0usize;
        for (index, path) in images.iter().enumerate() {
            progress.set_message(file_stem(path));

            // Distinct but reproducible seed per image in directory mode
            let mut image_config = encoder_config.clone();
            if let Some(seed) = encoder_config.seed {
                image_config.seed = Some(derive_seed(seed, index));
            }

            match encode_one(path, &image_config, sigma, &plan) {
                Ok(()) => encoded += 1,
                Err(CliError::Image(e)) if !single => {
                    warn!("Image couldn't be read: {}: {}", path.display(), e);
                    skipped += 1;
                }
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        if encoded == 0 {
            return Err(CliError::invalid_args(format!(
                "no image in {} could be read",
                self.input.display()
            )));
        }
        info!("Encoded {} image(s), skipped {}", encoded, skipped);
        Ok(())
    }
}

fn encode_one(path: &Path, config: &EncoderConfig, sigma: f32, plan: &OutputPlan) -> CliResult<()> {
    let grid = load_intensity_grid(path, sigma)?;
    info!(
        "Processing {} with shape {}x{}",
        path.display(),
        grid.height(),
        grid.width()
    );

    let collection = encode_image(&grid, config)?;
    debug!(
        "{}: {} spikes, {} of {} neurons active, mean rate {:.1} Hz",
        path.display(),
        collection.total_spikes(),
        collection.active_neurons(),
        collection.len(),
        collection.mean_firing_rate_hz()
    );

    let stem = file_stem(path);
    if plan.save_spikes {
        let out = spike_array_path(&plan.spike_dir, &stem, plan.format);
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| stem.clone());
        SpikeArrayFile::from_collection(vec![source], &collection, config)
            .write(&out, plan.format)?;
        info!("Spike array saved to {}", out.display());
    }

    if plan.save_plot {
        let out = raster_plot_path(&plan.plot_dir, &stem);
        match render_raster(&collection, &out, &format!("Raster plot of {}", stem)) {
            Ok(()) => info!("Raster plot saved to {}", out.display()),
            Err(e) => warn!("Raster plot for {} failed: {}", path.display(), e),
        }
    }
    Ok(())
}
