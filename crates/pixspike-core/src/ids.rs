//! Neuron identifiers and the pixel <-> neuron mapping

use core::fmt;

/// Neuron identifier
///
/// A neuron stands for exactly one pixel. Indices follow row-major
/// flattening of the image grid: `index = row * width + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeuronId(pub u32);

impl NeuronId {
    /// Create a new neuron ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Get the ID as a slice index
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Neuron for the pixel at `(row, col)` in a grid `width` pixels wide
    pub fn from_position(row: usize, col: usize, width: usize) -> Self {
        debug_assert!(col < width, "column {} outside width {}", col, width);
        Self((row * width + col) as u32)
    }

    /// Pixel position `(row, col)` of this neuron in a grid `width` pixels wide
    pub fn position(&self, width: usize) -> (usize, usize) {
        let index = self.index();
        (index / width, index % width)
    }
}

impl From<u32> for NeuronId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NeuronId> for u32 {
    fn from(id: NeuronId) -> Self {
        id.0
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}
