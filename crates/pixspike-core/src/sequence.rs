//! Multi-stimulus sequencing
//!
//! Stimulus `k` is encoded on its own and its spikes are moved to
//! `[k * period, k * period + on)`, where `period = on + off`. The OFF
//! interval after every stimulus stays silent, so consecutive images never
//! overlap in time. This is the only place where `off_duration_ms` changes
//! spike timestamps.
//!
//! Times are `f64` milliseconds, so their resolution shrinks as the offset
//! grows: near `T` ms two spikes closer than about `T * 2^-52` ms become the
//! same instant. The later one is then dropped (and counted in a warning) to
//! keep trains strictly increasing. Below roughly 10^9 ms of sequence this
//! only affects spikes less than a picosecond apart.

use crate::{
    error::*, map_to_rates, poisson, EncoderConfig, IntensityGrid, RateGrid, SpikeCollection,
    SpikeTrain,
};

/// Encode same-shaped images back to back into one collection
pub fn encode_sequence(grids: &[IntensityGrid], config: &EncoderConfig) -> Result<SpikeCollection> {
    config.validate()?;

    let first = grids
        .first()
        .ok_or_else(|| EncodeError::malformed_input("no images to sequence"))?;
    let (height, width) = first.shape();
    if let Some((k, grid)) = grids
        .iter()
        .enumerate()
        .find(|(_, g)| g.shape() != (height, width))
    {
        return Err(EncodeError::malformed_input(format!(
            "stimulus {} is {}x{}, expected {}x{}",
            k,
            grid.height(),
            grid.width(),
            height,
            width
        )));
    }
    config.check_size(first.neuron_count())?;

    let rate_grids = grids
        .iter()
        .map(|grid| map_to_rates(grid, config.max_freq_hz))
        .collect::<Result<Vec<RateGrid>>>()?;
    for rates in &rate_grids {
        poisson::validate_rates(rates, config)?;
    }

    let base_seed = config.seed.unwrap_or_else(rand::random);
    let window = config.window();
    let period = window.period_ms();
    log::debug!(
        "Sequencing {} stimuli with period {} ms ({} ms on, {} ms off)",
        grids.len(),
        period,
        window.on_ms,
        window.off_ms
    );

    let mut trains = vec![SpikeTrain::empty(); height * width];
    let mut dropped = 0usize;
    for (k, rates) in rate_grids.iter().enumerate() {
        let stimulus = poisson::sample_collection(
            rates,
            window,
            config.method,
            poisson::derive_seed(base_seed, k),
        );
        let offset = period * k as f64;
        for (train, later) in trains.iter_mut().zip(stimulus.into_trains()) {
            dropped += train.extend_after(later.shifted(offset));
        }
    }
    if dropped > 0 {
        log::warn!(
            "Dropped {} spike(s) that became indistinguishable after offsetting by up to {} ms",
            dropped,
            period * (grids.len() - 1) as f64
        );
    }

    Ok(SpikeCollection::new(height, width, window, grids.len(), trains).with_seed(base_seed))
}
