//! Image to spike-train encoder

use crate::{
    error::*, map_to_rates, poisson, sequence, EncoderConfig, IntensityGrid, RateGrid,
    SpikeCollection,
};

/// Encode one image: rate mapping followed by Poisson train generation
pub fn encode_image(grid: &IntensityGrid, config: &EncoderConfig) -> Result<SpikeCollection> {
    ImageEncoder::new(config.clone())?.encode(grid)
}

/// Reusable encoder holding a validated configuration
#[derive(Debug, Clone)]
pub struct ImageEncoder {
    config: EncoderConfig,
}

impl ImageEncoder {
    /// Create an encoder, validating the configuration up front
    pub fn new(config: EncoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Encoder configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Firing rates this encoder would use for `grid`
    pub fn rates(&self, grid: &IntensityGrid) -> Result<RateGrid> {
        map_to_rates(grid, self.config.max_freq_hz)
    }

    /// Encode one image into a spike collection
    pub fn encode(&self, grid: &IntensityGrid) -> Result<SpikeCollection> {
        self.config.check_size(grid.neuron_count())?;
        let rates = self.rates(grid)?;
        poisson::generate_trains_with(&rates, &self.config)
    }

    /// Encode several same-sized images one after another in time
    pub fn encode_sequence(&self, grids: &[IntensityGrid]) -> Result<SpikeCollection> {
        sequence::encode_sequence(grids, &self.config)
    }
}
