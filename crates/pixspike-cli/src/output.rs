//! Spike array files
//!
//! A spike array stores every neuron's train (row-major, one list of spike
//! times in ms per neuron) together with the parameters that produced it,
//! as pretty JSON or bincode.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use pixspike_core::{EncoderConfig, SpikeCollection, SpikeTrain, TimeWindow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// On-disk spike array encoding
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Compact bincode
    Bincode,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Bincode => "bin",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(OutputFormat::Json),
            "bin" | "bincode" => Some(OutputFormat::Bincode),
            _ => None,
        }
    }
}

/// Serialized spike array
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SpikeArrayFile {
    /// Source image name(s)
    pub source: Vec<String>,
    pub height: usize,
    pub width: usize,
    pub max_freq_hz: f64,
    pub on_duration_ms: f64,
    pub off_duration_ms: f64,
    pub stimulus_count: usize,
    pub seed: Option<u64>,
    /// Spike times (ms) per neuron, row-major
    pub trains: Vec<Vec<f64>>,
}

impl SpikeArrayFile {
    /// Capture a collection and the configuration that encoded it
    ///
    /// The seed is the one the collection was actually drawn with, so
    /// unseeded runs can be regenerated too.
    pub fn from_collection(
        source: Vec<String>,
        collection: &SpikeCollection,
        config: &EncoderConfig,
    ) -> Self {
        let window = collection.window();
        Self {
            source,
            height: collection.height(),
            width: collection.width(),
            max_freq_hz: config.max_freq_hz,
            on_duration_ms: window.on_ms,
            off_duration_ms: window.off_ms,
            stimulus_count: collection.stimulus_count(),
            seed: collection.seed(),
            trains: collection
                .trains()
                .iter()
                .map(|train| train.times().to_vec())
                .collect(),
        }
    }

    /// Rebuild and validate the spike collection
    pub fn to_collection(&self) -> CliResult<SpikeCollection> {
        let window = TimeWindow::new(self.on_duration_ms, self.off_duration_ms)?;
        let trains = self
            .trains
            .iter()
            .map(|times| SpikeTrain::from_times(times.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        let collection = SpikeCollection::from_trains(
            self.height,
            self.width,
            window,
            self.stimulus_count,
            trains,
        )?;
        Ok(match self.seed {
            Some(seed) => collection.with_seed(seed),
            None => collection,
        })
    }

    /// Write to `path` in the given format, creating parent directories
    pub fn write(&self, path: &Path, format: OutputFormat) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        match format {
            OutputFormat::Json => {
                let text = serde_json::to_string_pretty(self)?;
                std::fs::write(path, text)?;
            }
            OutputFormat::Bincode => {
                let bytes = bincode::serialize(self)?;
                std::fs::write(path, bytes)?;
            }
        }
        debug!("Wrote spike array to {}", path.display());
        Ok(())
    }

    /// Read a spike array, taking the format from the extension unless given
    pub fn read(path: &Path, format: Option<OutputFormat>) -> CliResult<Self> {
        if !path.exists() {
            return Err(CliError::missing_resource(format!(
                "spike array {}",
                path.display()
            )));
        }
        let format = format
            .or_else(|| OutputFormat::from_path(path))
            .ok_or_else(|| {
                CliError::invalid_args(format!(
                    "cannot tell the format of {}; pass --format",
                    path.display()
                ))
            })?;
        match format {
            OutputFormat::Json => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
            OutputFormat::Bincode => Ok(bincode::deserialize(&std::fs::read(path)?)?),
        }
    }
}

/// Stem used in output names, e.g. `digit` for `digits/digit.png`
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// `<dir>/spike_array_<stem>.<ext>`
pub fn spike_array_path(dir: &Path, stem: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("spike_array_{}.{}", stem, format.extension()))
}

/// `<dir>/raster_plot_<stem>.svg`
pub fn raster_plot_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("raster_plot_{}.svg", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixspike_core::{encode_image, IntensityGrid};

    fn sample() -> (SpikeCollection, EncoderConfig) {
        let grid = IntensityGrid::from_u8(&[0, 64, 128, 255], 2, 2).unwrap();
        let config = EncoderConfig::default().with_seed(5);
        (encode_image(&grid, &config).unwrap(), config)
    }

    #[test]
    fn test_output_names() {
        let dir = Path::new("out");
        assert_eq!(
            spike_array_path(dir, "cat", OutputFormat::Json),
            PathBuf::from("out/spike_array_cat.json")
        );
        assert_eq!(
            spike_array_path(dir, "cat", OutputFormat::Bincode),
            PathBuf::from("out/spike_array_cat.bin")
        );
        assert_eq!(raster_plot_path(dir, "cat"), PathBuf::from("out/raster_plot_cat.svg"));
        assert_eq!(file_stem(Path::new("digits/seven.png")), "seven");
    }

    #[test]
    fn test_file_keeps_every_neuron() {
        let (collection, config) = sample();
        let file = SpikeArrayFile::from_collection(vec!["a.png".into()], &collection, &config);
        assert_eq!(file.trains.len(), 4);
        assert!(file.trains[0].is_empty());
        assert_eq!(file.to_collection().unwrap(), collection);
    }

    #[test]
    fn test_unseeded_run_records_drawn_seed() {
        let grid = IntensityGrid::from_u8(&[0, 64, 128, 255], 2, 2).unwrap();
        let config = EncoderConfig::default();
        let collection = encode_image(&grid, &config).unwrap();
        let file = SpikeArrayFile::from_collection(vec![], &collection, &config);

        let seed = file.seed.unwrap();
        let regenerated = encode_image(&grid, &config.with_seed(seed)).unwrap();
        assert_eq!(file.to_collection().unwrap(), regenerated);
    }

    #[test]
    fn test_write_then_read_both_formats() {
        let (collection, config) = sample();
        let file = SpikeArrayFile::from_collection(vec!["a.png".into()], &collection, &config);
        let dir = tempfile::tempdir().unwrap();

        for format in [OutputFormat::Json, OutputFormat::Bincode] {
            let path = spike_array_path(&dir.path().join("arrays"), "a", format);
            file.write(&path, format).unwrap();
            assert_eq!(SpikeArrayFile::read(&path, None).unwrap(), file);
        }
    }

    #[test]
    fn test_tampered_file_rejected() {
        let (collection, config) = sample();
        let mut file = SpikeArrayFile::from_collection(vec![], &collection, &config);
        file.trains.pop();
        assert!(matches!(file.to_collection().unwrap_err(), CliError::Encode(_)));
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spikes.txt");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            SpikeArrayFile::read(&path, None).unwrap_err(),
            CliError::InvalidArgs(_)
        ));
    }
}
