//! Spike trains and the per-image spike collection

use crate::{error::*, NeuronId, TimeWindow};

/// Spike timestamps (ms) of one neuron, strictly increasing
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SpikeTrain {
    times: Vec<f64>,
}

impl SpikeTrain {
    /// Train that never fires
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap times the generator already produced in order
    pub(crate) fn new(times: Vec<f64>) -> Self {
        debug_assert!(times.windows(2).all(|w| w[0] < w[1]));
        Self { times }
    }

    /// Build from external timestamps, checking ordering
    pub fn from_times(times: Vec<f64>) -> Result<Self> {
        if let Some(t) = times.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(EncodeError::malformed_input(format!(
                "spike time {} is not a non-negative number",
                t
            )));
        }
        if let Some(w) = times.windows(2).find(|w| w[0] >= w[1]) {
            return Err(EncodeError::malformed_input(format!(
                "spike times not strictly increasing ({} then {})",
                w[0], w[1]
            )));
        }
        Ok(Self { times })
    }

    /// Spike times (ms)
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of spikes
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the neuron stayed silent
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First spike time
    pub fn first(&self) -> Option<f64> {
        self.times.first().copied()
    }

    /// Last spike time
    pub fn last(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Observed rate (Hz) over a window of `window_ms`
    pub fn firing_rate_hz(&self, window_ms: f64) -> f64 {
        if window_ms <= 0.0 {
            return 0.0;
        }
        self.times.len() as f64 * 1000.0 / window_ms
    }

    /// Same train moved later by `offset_ms`
    pub fn shifted(&self, offset_ms: f64) -> Self {
        Self {
            times: self.times.iter().map(|t| t + offset_ms).collect(),
        }
    }

    /// Append a later train; used when sequencing stimuli
    ///
    /// Times that rounding pushed onto or before the current last spike are
    /// dropped so the train stays strictly increasing. Returns how many were
    /// dropped.
    pub(crate) fn extend_after(&mut self, later: SpikeTrain) -> usize {
        let mut dropped = 0;
        for t in later.times {
            if self.times.last().map_or(true, |&last| t > last) {
                self.times.push(t);
            } else {
                dropped += 1;
            }
        }
        dropped
    }

    /// Consume into the raw timestamps
    pub fn into_times(self) -> Vec<f64> {
        self.times
    }
}

/// Spike trains for every neuron of one encoded image (or image sequence)
///
/// Always holds exactly `height * width` trains, in neuron order; silent
/// neurons have an empty train rather than no entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpikeCollection {
    height: usize,
    width: usize,
    window: TimeWindow,
    stimulus_count: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    seed: Option<u64>,
    trains: Vec<SpikeTrain>,
}

impl SpikeCollection {
    pub(crate) fn new(
        height: usize,
        width: usize,
        window: TimeWindow,
        stimulus_count: usize,
        trains: Vec<SpikeTrain>,
    ) -> Self {
        debug_assert_eq!(trains.len(), height * width);
        Self {
            height,
            width,
            window,
            stimulus_count,
            seed: None,
            trains,
        }
    }

    /// Record the base seed the trains were drawn with
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Base seed the trains were drawn with
    ///
    /// Always set on generated collections, including unseeded calls, so
    /// `EncoderConfig::with_seed(seed)` reproduces them exactly.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Rebuild a collection from stored trains, e.g. after deserialization
    pub fn from_trains(
        height: usize,
        width: usize,
        window: TimeWindow,
        stimulus_count: usize,
        trains: Vec<SpikeTrain>,
    ) -> Result<Self> {
        window.validate()?;
        if height == 0 || width == 0 {
            return Err(EncodeError::malformed_input(format!(
                "spike collection shape {}x{} is empty",
                height, width
            )));
        }
        if trains.len() != height * width {
            return Err(EncodeError::malformed_input(format!(
                "{} trains for a {}x{} grid",
                trains.len(),
                height,
                width
            )));
        }
        if stimulus_count == 0 {
            return Err(EncodeError::malformed_input("stimulus count is zero"));
        }
        let duration = window.period_ms() * (stimulus_count - 1) as f64 + window.on_ms;
        if let Some((i, t)) = trains
            .iter()
            .enumerate()
            .find_map(|(i, t)| t.last().filter(|&last| last >= duration).map(|last| (i, last)))
        {
            return Err(EncodeError::malformed_input(format!(
                "neuron {} spikes at {} ms, after the last ON window ends at {} ms",
                i, t, duration
            )));
        }
        Ok(Self::new(height, width, window, stimulus_count, trains))
    }

    /// Number of neurons (= height * width)
    pub fn len(&self) -> usize {
        self.trains.len()
    }

    /// Always false for a valid collection
    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// Source image height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Source image width
    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// ON/OFF window each stimulus was encoded with
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Number of stimuli laid end to end in this collection
    pub fn stimulus_count(&self) -> usize {
        self.stimulus_count
    }

    /// Total span covered, including trailing OFF intervals (ms)
    pub fn duration_ms(&self) -> f64 {
        self.window.period_ms() * self.stimulus_count as f64
    }

    /// Time spent in ON windows (ms)
    pub fn active_ms(&self) -> f64 {
        self.window.on_ms * self.stimulus_count as f64
    }

    /// Train of one neuron
    pub fn train(&self, neuron: NeuronId) -> Option<&SpikeTrain> {
        self.trains.get(neuron.index())
    }

    /// All trains in neuron order
    pub fn trains(&self) -> &[SpikeTrain] {
        &self.trains
    }

    /// `(neuron, train)` pairs in neuron order
    pub fn iter(&self) -> impl Iterator<Item = (NeuronId, &SpikeTrain)> {
        self.trains
            .iter()
            .enumerate()
            .map(|(i, train)| (NeuronId::new(i as u32), train))
    }

    /// Spikes across all neurons
    pub fn total_spikes(&self) -> usize {
        self.trains.iter().map(SpikeTrain::len).sum()
    }

    /// Neurons with at least one spike
    pub fn active_neurons(&self) -> usize {
        self.trains.iter().filter(|t| !t.is_empty()).count()
    }

    /// Observed rate of one neuron over the ON time (Hz)
    pub fn firing_rate_hz(&self, neuron: NeuronId) -> Option<f64> {
        self.train(neuron).map(|t| t.firing_rate_hz(self.active_ms()))
    }

    /// Observed rate averaged over all neurons (Hz)
    pub fn mean_firing_rate_hz(&self) -> f64 {
        if self.trains.is_empty() {
            return 0.0;
        }
        let per_neuron = self.total_spikes() as f64 / self.trains.len() as f64;
        per_neuron * 1000.0 / self.active_ms()
    }

    /// Flat `(time_ms, neuron)` list sorted by time, then neuron
    pub fn export_spikes(&self) -> Vec<(f64, u32)> {
        let mut spikes: Vec<(f64, u32)> = self
            .iter()
            .flat_map(|(id, train)| train.times().iter().map(move |&t| (t, id.raw())))
            .collect();
        spikes.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        spikes
    }

    /// Consume into the per-neuron trains
    pub fn into_trains(self) -> Vec<SpikeTrain> {
        self.trains
    }
}
