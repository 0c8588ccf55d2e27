//! Configuration management for the pixspike CLI
//!
//! Values come from three layers, later ones winning: built-in defaults,
//! the TOML config file, then command-line flags.

use std::path::{Path, PathBuf};

use pixspike_core::{EncoderConfig, SamplingMethod, DEFAULT_MAX_NEURONS};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// Default Gaussian receptive-field width (pixels)
pub const DEFAULT_SIGMA: f32 = 1.0;

/// Global CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Default logging level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Encoding parameters
    pub encoder: EncoderSection,

    /// Where and how results are written
    pub output: OutputSection,
}

/// `[encoder]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSection {
    /// Rate of a full-intensity pixel (Hz)
    pub max_freq_hz: f64,
    /// ON duration (ms)
    pub on_duration_ms: f64,
    /// OFF duration (ms)
    pub off_duration_ms: f64,
    /// Receptive-field Gaussian sigma (pixels, 0 disables)
    pub sigma: f32,
    /// Base seed for reproducible output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Largest image (in pixels) encoded without `--allow-large`
    pub max_neurons: usize,
    /// Spike time sampling
    pub method: SamplingMethod,
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory for spike arrays
    pub spike_dir: PathBuf,
    /// Directory for raster plots
    pub plot_dir: PathBuf,
    /// Spike array format
    pub format: OutputFormat,
    /// Write spike arrays
    pub save_spikes: bool,
    /// Write raster plots
    pub save_plot: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            encoder: EncoderSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl Default for EncoderSection {
    fn default() -> Self {
        let defaults = EncoderConfig::default();
        Self {
            max_freq_hz: defaults.max_freq_hz,
            on_duration_ms: defaults.on_duration_ms,
            off_duration_ms: defaults.off_duration_ms,
            sigma: DEFAULT_SIGMA,
            seed: None,
            max_neurons: DEFAULT_MAX_NEURONS,
            method: SamplingMethod::Exponential,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            spike_dir: PathBuf::from("spike_arrays"),
            plot_dir: PathBuf::from("raster_plots"),
            format: OutputFormat::Json,
            save_spikes: true,
            save_plot: true,
        }
    }
}

/// Encoder values given on the command line
#[derive(Debug, Clone, Default)]
pub struct EncoderOverrides {
    /// `--max-freq`
    pub max_freq_hz: Option<f64>,
    /// `--on-duration`
    pub on_duration_ms: Option<f64>,
    /// `--off-duration`
    pub off_duration_ms: Option<f64>,
    /// `--seed`
    pub seed: Option<u64>,
    /// `--bin-ms`; switches to binned sampling
    pub bin_ms: Option<f64>,
    /// `--allow-large`
    pub allow_large: bool,
}

impl EncoderSection {
    /// Build a validated encoder configuration with command-line overrides applied
    pub fn to_encoder_config(&self, overrides: &EncoderOverrides) -> CliResult<EncoderConfig> {
        let method = match overrides.bin_ms {
            Some(bin_ms) => SamplingMethod::Binned { bin_ms },
            None => self.method,
        };

        let config = EncoderConfig {
            max_freq_hz: overrides.max_freq_hz.unwrap_or(self.max_freq_hz),
            on_duration_ms: overrides.on_duration_ms.unwrap_or(self.on_duration_ms),
            off_duration_ms: overrides.off_duration_ms.unwrap_or(self.off_duration_ms),
            seed: overrides.seed.or(self.seed),
            method,
            max_neurons: self.max_neurons,
            allow_large: overrides.allow_large,
        };
        config.validate()?;
        Ok(config)
    }
}

impl CliConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| CliError::config(format!("Invalid config file {}: {}", path.display(), e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Load the explicit config file, or the user default if one exists
    pub fn resolve(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(CliError::missing_resource(format!(
                "config file {}",
                path.display()
            ))),
            Some(path) => Self::load_from_file(path),
            None => match Self::default_config_path() {
                Ok(path) => Self::load_from_file(&path),
                Err(_) => Ok(Self::default()),
            },
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> CliResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?;
        Ok(config_dir.join("pixspike").join("config.toml"))
    }
}
