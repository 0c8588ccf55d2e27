//! Intensity and firing-rate grids
//!
//! Both grids are row-major `ndarray` arrays (rows = height, columns =
//! width). Neuron `i` always corresponds to flattened element `i`.

use ndarray::{Array2, ArrayView2};

use crate::{error::*, NeuronId, DEFAULT_INTENSITY_MAX};

/// Validated grayscale intensity image
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityGrid {
    values: Array2<f32>,
    max_value: f32,
}

impl IntensityGrid {
    /// Wrap an array of intensities in `[0, max_value]`
    pub fn new(values: Array2<f32>, max_value: f32) -> Result<Self> {
        if !max_value.is_finite() || max_value <= 0.0 {
            return Err(EncodeError::malformed_input(format!(
                "declared intensity range [0, {}] is invalid",
                max_value
            )));
        }

        let (height, width) = values.dim();
        if height == 0 || width == 0 {
            return Err(EncodeError::malformed_input(format!(
                "intensity grid is empty ({}x{})",
                height, width
            )));
        }

        if let Some(((row, col), value)) = values
            .indexed_iter()
            .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > max_value)
        {
            return Err(EncodeError::malformed_input(format!(
                "intensity {} at ({}, {}) outside [0, {}]",
                value, row, col, max_value
            )));
        }

        Ok(Self { values, max_value })
    }

    /// Build from nested rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f32>>, max_value: f32) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(EncodeError::malformed_input(format!(
                "row {} has {} values, expected {}",
                row,
                bad.len(),
                width
            )));
        }

        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        Self::from_flat(flat, height, width, max_value)
    }

    /// Build from a row-major flattened vector
    pub fn from_flat(data: Vec<f32>, height: usize, width: usize, max_value: f32) -> Result<Self> {
        if height.checked_mul(width) != Some(data.len()) {
            return Err(EncodeError::malformed_input(format!(
                "{} values cannot fill a {}x{} grid",
                data.len(),
                height,
                width
            )));
        }

        let values = Array2::from_shape_vec((height, width), data)
            .map_err(|e| EncodeError::malformed_input(e.to_string()))?;
        Self::new(values, max_value)
    }

    /// Build from 8-bit grayscale pixels, declared range `[0, 255]`
    pub fn from_u8(pixels: &[u8], height: usize, width: usize) -> Result<Self> {
        let data = pixels.iter().map(|&p| p as f32).collect();
        Self::from_flat(data, height, width, DEFAULT_INTENSITY_MAX)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// One neuron per pixel
    pub fn neuron_count(&self) -> usize {
        self.values.len()
    }

    /// Upper bound of the declared intensity range
    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    /// Intensity at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.values.get((row, col)).copied()
    }

    /// Borrow the underlying array
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.values.view()
    }

    /// Intensities in neuron order
    pub fn flattened(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().copied()
    }
}

/// Target firing rates (Hz), one per neuron
#[derive(Debug, Clone, PartialEq)]
pub struct RateGrid {
    rates: Array2<f64>,
}

impl RateGrid {
    /// Wrap an array of rates
    ///
    /// Rates are checked by the train generator, not here, so that callers
    /// can feed rates from sources other than [`crate::map_to_rates`].
    pub fn from_array(rates: Array2<f64>) -> Self {
        Self { rates }
    }

    /// Build from a row-major flattened vector
    pub fn from_flat(data: Vec<f64>, height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(EncodeError::malformed_input(format!(
                "rate grid is empty ({}x{})",
                height, width
            )));
        }
        if height.checked_mul(width) != Some(data.len()) {
            return Err(EncodeError::malformed_input(format!(
                "{} rates cannot fill a {}x{} grid",
                data.len(),
                height,
                width
            )));
        }
        let rates = Array2::from_shape_vec((height, width), data)
            .map_err(|e| EncodeError::malformed_input(e.to_string()))?;
        Ok(Self { rates })
    }

    /// Rate of a single neuron
    pub fn rate(&self, neuron: NeuronId) -> Option<f64> {
        let width = self.width();
        if width == 0 {
            return None;
        }
        self.rates.get(neuron.position(width)).copied()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rates.nrows()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.rates.ncols()
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        self.rates.dim()
    }

    /// One neuron per element
    pub fn neuron_count(&self) -> usize {
        self.rates.len()
    }

    /// Highest rate in the grid, `0.0` for an empty grid
    pub fn max_rate(&self) -> f64 {
        self.rates.iter().copied().fold(0.0, f64::max)
    }

    /// Mean rate across all neurons
    pub fn mean_rate(&self) -> f64 {
        self.rates.mean().unwrap_or(0.0)
    }

    /// Borrow the underlying array
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.rates.view()
    }

    /// Rates in neuron order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.rates.iter().copied()
    }
}
