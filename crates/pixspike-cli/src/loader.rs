//! Image loading and receptive-field filtering
//!
//! Produces the smoothed [`IntensityGrid`] the encoder consumes.

use std::path::Path;

use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;
use pixspike_core::{IntensityGrid, DEFAULT_INTENSITY_MAX};

use crate::error::{CliError, CliResult};

/// Decode an image file and convert it to 8-bit grayscale
pub fn load_grayscale(path: &Path) -> CliResult<GrayImage> {
    let image = image::open(path)?;
    Ok(image.to_luma8())
}

/// Gaussian blur approximating early visual receptive fields
///
/// `sigma == 0` returns the image unchanged.
pub fn apply_receptive_field_filter(image: &GrayImage, sigma: f32) -> CliResult<GrayImage> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(CliError::invalid_args(format!(
            "sigma must be a non-negative number, got {}",
            sigma
        )));
    }
    if sigma == 0.0 {
        return Ok(image.clone());
    }
    Ok(gaussian_blur_f32(image, sigma))
}

/// Row-major intensity grid in `[0, 255]`
pub fn to_intensity_grid(image: &GrayImage) -> CliResult<IntensityGrid> {
    let (width, height) = image.dimensions();
    let pixels: Vec<f32> = image.pixels().map(|p| p.0[0] as f32).collect();
    Ok(IntensityGrid::from_flat(
        pixels,
        height as usize,
        width as usize,
        DEFAULT_INTENSITY_MAX,
    )?)
}

/// Load, filter and convert an image in one step
pub fn load_intensity_grid(path: &Path, sigma: f32) -> CliResult<IntensityGrid> {
    let gray = load_grayscale(path)?;
    tracing::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        gray.height(),
        gray.width()
    );
    let filtered = apply_receptive_field_filter(&gray, sigma)?;
    to_intensity_grid(&filtered)
}
