//! Raster plot command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{file_stem, raster_plot_path, OutputFormat, SpikeArrayFile};
use crate::raster::render_raster;

/// Render a raster plot from a spike array file
#[derive(Args, Debug)]
pub struct RasterCommand {
    /// Spike array file (.json or .bin)
    pub input: PathBuf,

    /// Output SVG path (defaults to the configured plot directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input format, when the extension is not .json or .bin
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl RasterCommand {
    pub fn execute(self, config_path: Option<&Path>) -> CliResult<()> {
        let file = SpikeArrayFile::read(&self.input, self.format)?;
        let collection = file.to_collection()?;

        // spike_array_<stem> -> raster_plot_<stem>
        let stem = file_stem(&self.input);
        let stem = stem.strip_prefix("spike_array_").unwrap_or(&stem).to_string();
        let output = match self.output {
            Some(path) => path,
            None => {
                let config = CliConfig::resolve(config_path)?;
                raster_plot_path(&config.output.plot_dir, &stem)
            }
        };

        let title = if file.source.is_empty() {
            format!("Raster plot of {}", stem)
        } else {
            format!("Raster plot of {}", file.source.join(", "))
        };
        render_raster(&collection, &output, &title)?;
        info!(
            "Raster plot of {} spikes saved to {}",
            collection.total_spikes(),
            output.display()
        );
        Ok(())
    }
}
