//! Poisson spike-train generation
//!
//! Every neuron fires as an independent constant-rate Poisson process during
//! the ON window. Randomness comes from one ChaCha8 stream per neuron: the
//! key is the base seed and the stream number is the neuron index. A
//! neuron's train therefore depends only on the base seed, its own index and
//! rate, the window and the sampling method, never on how many other neurons
//! exist or on the order (or thread) in which they are generated.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Exp1;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    config::{check_expected_spikes, MAX_BIN_PROBABILITY, MAX_EXPECTED_SPIKES_PER_NEURON},
    error::*, EncoderConfig, NeuronId, RateGrid, SamplingMethod,
    SpikeCollection, SpikeTrain, TimeWindow,
};

/// Stream numbers at or above this are reserved for seed derivation and
/// never collide with a neuron stream.
const DERIVED_SEED_STREAM_BASE: u64 = 1 << 32;

/// Expected number of spikes for a neuron at `rate_hz` over `on_ms`
pub fn expected_spike_count(rate_hz: f64, on_ms: f64) -> f64 {
    rate_hz * on_ms / 1000.0
}

/// Generate one Poisson train per neuron using fresh entropy
///
/// `off_duration_ms` is validated and recorded on the collection but does not
/// influence spike times; every timestamp lies in `[0, on_duration_ms)`.
pub fn generate_trains(
    rates: &RateGrid,
    on_duration_ms: f64,
    off_duration_ms: f64,
) -> Result<SpikeCollection> {
    let config = EncoderConfig {
        on_duration_ms,
        off_duration_ms,
        ..Default::default()
    };
    generate_trains_with(rates, &config)
}

/// Generate one Poisson train per neuron with explicit seed, method and size policy
pub fn generate_trains_with(rates: &RateGrid, config: &EncoderConfig) -> Result<SpikeCollection> {
    config.validate()?;
    validate_rates(rates, config)?;

    let base_seed = config.seed.unwrap_or_else(rand::random);
    Ok(sample_collection(rates, config.window(), config.method, base_seed))
}

/// Reject grids the generator must not touch, before any sampling
pub(crate) fn validate_rates(rates: &RateGrid, config: &EncoderConfig) -> Result<()> {
    let (height, width) = rates.shape();
    if height == 0 || width == 0 {
        return Err(EncodeError::malformed_input(format!(
            "rate grid is empty ({}x{})",
            height, width
        )));
    }
    config.check_size(rates.neuron_count())?;

    if let Some((i, rate)) = rates
        .iter()
        .enumerate()
        .find(|(_, r)| !r.is_finite() || *r < 0.0)
    {
        return Err(EncodeError::invalid_config(
            format!("rate[{}]", NeuronId::new(i as u32)),
            rate,
            ">= 0 and finite",
        ));
    }

    let on_ms = config.on_duration_ms;
    if let Some((i, rate)) = rates
        .iter()
        .enumerate()
        .find(|(_, r)| expected_spike_count(*r, on_ms) > MAX_EXPECTED_SPIKES_PER_NEURON)
    {
        check_expected_spikes(format!("rate[{}]", NeuronId::new(i as u32)), rate, on_ms)?;
    }

    Ok(())
}

/// Sample every neuron of an already validated grid
pub(crate) fn sample_collection(
    rates: &RateGrid,
    window: TimeWindow,
    method: SamplingMethod,
    base_seed: u64,
) -> SpikeCollection {
    let (height, width) = rates.shape();
    log::debug!(
        "Generating Poisson trains for {} neurons ({}x{}) over {} ms",
        rates.neuron_count(),
        height,
        width,
        window.on_ms
    );

    if let SamplingMethod::Binned { bin_ms } = method {
        let peak = rates.max_rate() * bin_ms / 1000.0;
        if peak > MAX_BIN_PROBABILITY {
            log::warn!(
                "Per-bin spike probability {:.3} exceeds {}; clamping (rates above {:.1} Hz are under-sampled)",
                peak,
                MAX_BIN_PROBABILITY,
                MAX_BIN_PROBABILITY * 1000.0 / bin_ms
            );
        }
    }

    let rate_values: Vec<f64> = rates.iter().collect();

    #[cfg(feature = "parallel")]
    let trains: Vec<SpikeTrain> = rate_values
        .par_iter()
        .enumerate()
        .map(|(i, &rate)| sample_neuron(base_seed, NeuronId::new(i as u32), rate, window.on_ms, method))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let trains: Vec<SpikeTrain> = rate_values
        .iter()
        .enumerate()
        .map(|(i, &rate)| sample_neuron(base_seed, NeuronId::new(i as u32), rate, window.on_ms, method))
        .collect();

    let collection = SpikeCollection::new(height, width, window, 1, trains).with_seed(base_seed);
    log::debug!(
        "Generated {} spikes ({} active neurons)",
        collection.total_spikes(),
        collection.active_neurons()
    );
    collection
}

/// Independent random stream for one neuron
pub fn neuron_rng(base_seed: u64, neuron: NeuronId) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    rng.set_stream(neuron.raw() as u64);
    rng
}

/// Base seed for the `index`-th stimulus of a sequence
///
/// Index 0 keeps the base seed, so a one-image sequence matches a single encode.
pub fn derive_seed(base_seed: u64, index: usize) -> u64 {
    if index == 0 {
        return base_seed;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    rng.set_stream(DERIVED_SEED_STREAM_BASE + index as u64);
    rng.next_u64()
}

fn sample_neuron(
    base_seed: u64,
    neuron: NeuronId,
    rate_hz: f64,
    on_ms: f64,
    method: SamplingMethod,
) -> SpikeTrain {
    if rate_hz == 0.0 {
        return SpikeTrain::empty();
    }

    let mut rng = neuron_rng(base_seed, neuron);
    let times = match method {
        SamplingMethod::Exponential => exponential_times(&mut rng, rate_hz, on_ms),
        SamplingMethod::Binned { bin_ms } => binned_times(&mut rng, rate_hz, on_ms, bin_ms),
    };
    SpikeTrain::new(times)
}

/// Accumulate exponential inter-spike intervals until the window closes
fn exponential_times<R: Rng>(rng: &mut R, rate_hz: f64, on_ms: f64) -> Vec<f64> {
    let rate_per_ms = rate_hz / 1000.0;
    let expected = expected_spike_count(rate_hz, on_ms).min(MAX_EXPECTED_SPIKES_PER_NEURON);
    let mut times = Vec::with_capacity(expected.ceil() as usize + 1);

    let mut t = 0.0;
    loop {
        let interval: f64 = rng.sample(Exp1);
        t += interval / rate_per_ms;
        if t >= on_ms {
            break;
        }
        // an interval can underflow to zero at extreme rates
        if times.last().map_or(true, |&last| t > last) {
            times.push(t);
        }
    }

    times
}

/// One Bernoulli trial per bin, spikes stamped at bin starts
fn binned_times<R: Rng>(rng: &mut R, rate_hz: f64, on_ms: f64, bin_ms: f64) -> Vec<f64> {
    let p = (rate_hz * bin_ms / 1000.0).min(MAX_BIN_PROBABILITY);
    let bins = (on_ms / bin_ms).ceil() as usize;

    (0..bins)
        .map(|b| b as f64 * bin_ms)
        .filter(|&t| t < on_ms)
        .filter(|_| rng.gen_bool(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_rates(rate: f64, height: usize, width: usize) -> RateGrid {
        RateGrid::from_flat(vec![rate; height * width], height, width).unwrap()
    }

    #[test]
    fn test_zero_rate_is_silent() {
        let config = EncoderConfig::default().with_seed(1);
        let collection = generate_trains_with(&uniform_rates(0.0, 4, 4), &config).unwrap();
        assert_eq!(collection.len(), 16);
        assert_eq!(collection.total_spikes(), 0);
    }

    #[test]
    fn test_times_within_window_and_increasing() {
        let config = EncoderConfig::new(1000.0, 50.0, 25.0).unwrap().with_seed(3);
        let collection = generate_trains_with(&uniform_rates(800.0, 3, 3), &config).unwrap();
        for (_, train) in collection.iter() {
            assert!(train.times().iter().all(|&t| (0.0..50.0).contains(&t)));
            assert!(train.times().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = EncoderConfig::default().with_seed(42);
        let rates = uniform_rates(300.0, 2, 3);
        let a = generate_trains_with(&rates, &config).unwrap();
        let b = generate_trains_with(&rates, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_neuron_streams_independent_of_grid_size() {
        let config = EncoderConfig::default().with_seed(9);
        let small = generate_trains_with(&uniform_rates(200.0, 1, 2), &config).unwrap();
        let large = generate_trains_with(&uniform_rates(200.0, 4, 4), &config).unwrap();
        assert_eq!(small.train(NeuronId::new(0)), large.train(NeuronId::new(0)));
        assert_eq!(small.train(NeuronId::new(1)), large.train(NeuronId::new(1)));
    }

    #[test]
    fn test_neurons_are_not_copies() {
        let config = EncoderConfig::default().with_seed(5);
        let collection = generate_trains_with(&uniform_rates(500.0, 1, 2), &config).unwrap();
        assert_ne!(collection.train(NeuronId::new(0)), collection.train(NeuronId::new(1)));
    }

    #[test]
    fn test_invalid_window_rejected() {
        let rates = uniform_rates(10.0, 1, 1);
        assert!(generate_trains(&rates, 0.0, 0.0).unwrap_err().is_config_error());
        assert!(generate_trains(&rates, 10.0, -1.0).unwrap_err().is_config_error());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let rates = RateGrid::from_flat(vec![1.0, -1.0], 1, 2).unwrap();
        let err = generate_trains(&rates, 10.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("rate[n1]"));
    }

    #[test]
    fn test_nan_rate_rejected() {
        let rates = RateGrid::from_flat(vec![f64::NAN], 1, 1).unwrap();
        assert!(generate_trains(&rates, 10.0, 0.0).is_err());
    }

    #[test]
    fn test_extreme_rate_rejected_before_sampling() {
        let rates = RateGrid::from_flat(vec![10.0, 1e20], 1, 2).unwrap();
        let err = generate_trains_with(&rates, &EncoderConfig::default().with_seed(1)).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidConfig { ref parameter, .. } if parameter == "rate[n1]"));
    }

    #[test]
    fn test_size_limit() {
        let rates = uniform_rates(1.0, 4, 4);
        let config = EncoderConfig::default().with_max_neurons(8);
        let err = generate_trains_with(&rates, &config).unwrap_err();
        assert_eq!(err, EncodeError::unsupported_size(16, 8));

        let collection = generate_trains_with(&rates, &config.allow_large(true)).unwrap();
        assert_eq!(collection.len(), 16);
    }

    #[test]
    fn test_binned_times_on_bin_starts() {
        let config = EncoderConfig::new(1000.0, 20.0, 0.0)
            .unwrap()
            .with_seed(11)
            .with_method(SamplingMethod::millisecond_bins());
        let collection = generate_trains_with(&uniform_rates(100.0, 2, 2), &config).unwrap();
        for (_, train) in collection.iter() {
            assert!(train.times().iter().all(|t| t.fract() == 0.0 && *t < 20.0));
        }
    }

    #[test]
    fn test_binned_probability_clamped() {
        let mut rng = neuron_rng(0, NeuronId::new(0));
        // 1000 Hz at 1 ms bins would be p = 1; clamped to MAX_BIN_PROBABILITY
        let times = binned_times(&mut rng, 1000.0, 10_000.0, 1.0);
        let fraction = times.len() as f64 / 10_000.0;
        assert!(fraction < MAX_BIN_PROBABILITY + 0.02, "fraction {}", fraction);
    }

    #[test]
    fn test_derive_seed() {
        assert_eq!(derive_seed(77, 0), 77);
        assert_ne!(derive_seed(77, 1), derive_seed(77, 2));
        assert_eq!(derive_seed(77, 3), derive_seed(77, 3));
    }
}
