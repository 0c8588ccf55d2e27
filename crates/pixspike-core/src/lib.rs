//! Pixel-intensity to Poisson spike-train encoder
//!
//! This crate turns a (pre-smoothed) grayscale image into one Poisson spike
//! train per pixel, ready to drive a spiking neural network simulation:
//!
//! ```text
//! IntensityGrid --map_to_rates--> RateGrid --generate_trains--> SpikeCollection
//! ```
//!
//! Image decoding, receptive-field filtering, serialization and plotting
//! live in the `pixspike-cli` crate; this crate does no I/O.
//!
//! ```
//! use pixspike_core::{encode_image, EncoderConfig, IntensityGrid, NeuronId};
//!
//! let grid = IntensityGrid::from_u8(&[0, 255, 128, 255], 2, 2).unwrap();
//! let config = EncoderConfig::new(1000.0, 200.0, 100.0).unwrap().with_seed(42);
//! let spikes = encode_image(&grid, &config).unwrap();
//!
//! assert_eq!(spikes.len(), 4);
//! assert!(spikes.train(NeuronId::new(0)).unwrap().is_empty());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod encoder;
pub mod error;
pub mod grid;
pub mod ids;
pub mod poisson;
pub mod rate;
pub mod sequence;
pub mod train;

pub use config::{EncoderConfig, SamplingMethod, TimeWindow};
pub use encoder::{encode_image, ImageEncoder};
pub use error::{EncodeError, Result};
pub use grid::{IntensityGrid, RateGrid};
pub use ids::NeuronId;
pub use poisson::{expected_spike_count, generate_trains, generate_trains_with};
pub use rate::map_to_rates;
pub use sequence::encode_sequence;
pub use train::{SpikeCollection, SpikeTrain};

/// Upper bound of 8-bit grayscale intensities
pub const DEFAULT_INTENSITY_MAX: f32 = 255.0;

/// Default rate of a full-intensity pixel (Hz)
pub const DEFAULT_MAX_FREQ_HZ: f64 = 1000.0;

/// Default ON duration (ms)
pub const DEFAULT_ON_DURATION_MS: f64 = 200.0;

/// Default OFF duration (ms)
pub const DEFAULT_OFF_DURATION_MS: f64 = 100.0;

/// Neurons processed without explicit opt-in (a 256x256 image)
pub const DEFAULT_MAX_NEURONS: usize = 256 * 256;
