//! Encoder configuration

use crate::{
    error::*, DEFAULT_MAX_FREQ_HZ, DEFAULT_MAX_NEURONS, DEFAULT_OFF_DURATION_MS,
    DEFAULT_ON_DURATION_MS,
};

/// Largest per-bin spike probability accepted by [`SamplingMethod::Binned`]
pub const MAX_BIN_PROBABILITY: f64 = 0.1;

/// Largest expected spike count of one neuron over the ON window
///
/// `rate_hz * on_ms / 1000` above this is rejected before sampling; it
/// bounds per-neuron memory and keeps spike times resolvable in `f64`.
pub const MAX_EXPECTED_SPIKES_PER_NEURON: f64 = 1.0e6;

/// Largest number of bins per neuron for [`SamplingMethod::Binned`]
pub const MAX_BINS_PER_NEURON: f64 = 1.0e7;

/// How spike times are drawn within the ON window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "kind"))]
pub enum SamplingMethod {
    /// Accumulate exponentially distributed inter-spike intervals.
    /// Exact for a constant-rate Poisson process.
    #[default]
    Exponential,
    /// One Bernoulli trial per bin of `bin_ms`, spikes stamped at the bin start.
    ///
    /// With per-bin probability `p = rate * bin_ms / 1000` the expected count
    /// is exact, but the count variance is `n p (1 - p)` instead of `n p` and
    /// intervals are quantized to `bin_ms`. `p` is clamped to
    /// [`MAX_BIN_PROBABILITY`], keeping the variance error under 10%; rates
    /// above the clamp are under-sampled.
    Binned {
        /// Bin width (ms)
        bin_ms: f64,
    },
}

impl SamplingMethod {
    /// 1 ms bins, the resolution of the classic tutorial encoders
    pub const fn millisecond_bins() -> Self {
        Self::Binned { bin_ms: 1.0 }
    }

    /// Validate method parameters
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Exponential => Ok(()),
            Self::Binned { bin_ms } => {
                if !bin_ms.is_finite() || bin_ms <= 0.0 {
                    return Err(EncodeError::invalid_config("bin_ms", bin_ms, "> 0"));
                }
                Ok(())
            }
        }
    }
}

/// Stimulus time window: spikes during ON, silence during OFF
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    /// Active stimulus duration (ms)
    pub on_ms: f64,
    /// Trailing silent duration (ms)
    pub off_ms: f64,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            on_ms: DEFAULT_ON_DURATION_MS,
            off_ms: DEFAULT_OFF_DURATION_MS,
        }
    }
}

impl TimeWindow {
    /// Create a new window with validation
    pub fn new(on_ms: f64, off_ms: f64) -> Result<Self> {
        if !on_ms.is_finite() || on_ms <= 0.0 {
            return Err(EncodeError::invalid_config("on_duration_ms", on_ms, "> 0"));
        }
        if !off_ms.is_finite() || off_ms < 0.0 {
            return Err(EncodeError::invalid_config("off_duration_ms", off_ms, ">= 0"));
        }
        Ok(Self { on_ms, off_ms })
    }

    /// ON + OFF, the spacing between consecutive stimuli (ms)
    pub fn period_ms(&self) -> f64 {
        self.on_ms + self.off_ms
    }

    /// Validate window
    pub fn validate(&self) -> Result<()> {
        Self::new(self.on_ms, self.off_ms)?;
        Ok(())
    }
}

/// Parameters for encoding an image into spike trains
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncoderConfig {
    /// Rate of a pixel at full intensity (Hz)
    pub max_freq_hz: f64,
    /// Active stimulus duration (ms)
    pub on_duration_ms: f64,
    /// Trailing silent duration (ms); only moves later stimuli in a sequence
    pub off_duration_ms: f64,
    /// Base seed for reproducible trains (None = fresh entropy per call)
    pub seed: Option<u64>,
    /// Spike time sampling method
    pub method: SamplingMethod,
    /// Largest neuron count processed without `allow_large`
    pub max_neurons: usize,
    /// Process grids above `max_neurons` instead of failing
    pub allow_large: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_freq_hz: DEFAULT_MAX_FREQ_HZ,
            on_duration_ms: DEFAULT_ON_DURATION_MS,
            off_duration_ms: DEFAULT_OFF_DURATION_MS,
            seed: None,
            method: SamplingMethod::Exponential,
            max_neurons: DEFAULT_MAX_NEURONS,
            allow_large: false,
        }
    }
}

impl EncoderConfig {
    /// Create new encoder parameters with validation
    pub fn new(max_freq_hz: f64, on_duration_ms: f64, off_duration_ms: f64) -> Result<Self> {
        if !max_freq_hz.is_finite() || max_freq_hz <= 0.0 {
            return Err(EncodeError::invalid_config("max_freq_hz", max_freq_hz, "> 0"));
        }
        TimeWindow::new(on_duration_ms, off_duration_ms)?;
        check_expected_spikes("max_freq_hz", max_freq_hz, on_duration_ms)?;

        Ok(Self {
            max_freq_hz,
            on_duration_ms,
            off_duration_ms,
            ..Default::default()
        })
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set spike time sampling method
    pub fn with_method(mut self, method: SamplingMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the neuron count above which encoding fails without opt-in
    pub fn with_max_neurons(mut self, max_neurons: usize) -> Self {
        self.max_neurons = max_neurons;
        self
    }

    /// Opt in to grids larger than `max_neurons`
    pub fn allow_large(mut self, allow: bool) -> Self {
        self.allow_large = allow;
        self
    }

    /// ON/OFF window
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            on_ms: self.on_duration_ms,
            off_ms: self.off_duration_ms,
        }
    }

    /// ON + OFF (ms)
    pub fn period_ms(&self) -> f64 {
        self.window().period_ms()
    }

    /// Check a neuron count against the size policy
    pub fn check_size(&self, neurons: usize) -> Result<()> {
        let hard_limit = u32::MAX as usize;
        if neurons > hard_limit {
            return Err(EncodeError::unsupported_size(neurons, hard_limit));
        }
        if neurons > self.max_neurons && !self.allow_large {
            return Err(EncodeError::unsupported_size(neurons, self.max_neurons));
        }
        Ok(())
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        Self::new(self.max_freq_hz, self.on_duration_ms, self.off_duration_ms)?;
        self.method.validate()?;

        if let SamplingMethod::Binned { bin_ms } = self.method {
            let bins = self.on_duration_ms / bin_ms;
            if bins > MAX_BINS_PER_NEURON {
                return Err(EncodeError::invalid_config(
                    "bin_ms",
                    bin_ms,
                    format!(
                        ">= {} ms for a {} ms ON window (at most {} bins)",
                        self.on_duration_ms / MAX_BINS_PER_NEURON,
                        self.on_duration_ms,
                        MAX_BINS_PER_NEURON
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Reject a rate whose expected spike count over `on_ms` exceeds
/// [`MAX_EXPECTED_SPIKES_PER_NEURON`]
pub(crate) fn check_expected_spikes(
    parameter: impl Into<String>,
    rate_hz: f64,
    on_ms: f64,
) -> Result<()> {
    if rate_hz * on_ms / 1000.0 > MAX_EXPECTED_SPIKES_PER_NEURON {
        return Err(EncodeError::invalid_config(
            parameter,
            rate_hz,
            format!(
                "<= {} Hz for a {} ms ON window (at most {} expected spikes per neuron)",
                MAX_EXPECTED_SPIKES_PER_NEURON * 1000.0 / on_ms,
                on_ms,
                MAX_EXPECTED_SPIKES_PER_NEURON
            ),
        ));
    }
    Ok(())
}
