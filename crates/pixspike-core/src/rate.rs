//! Intensity to firing-rate mapping

use crate::{error::*, IntensityGrid, RateGrid};

/// Map pixel intensities to firing rates (Hz)
///
/// The mapping is linear in normalized intensity,
/// `rate = max_freq_hz * intensity / max_value`, so a black pixel never
/// fires and a pixel at the top of the declared range fires at `max_freq_hz`.
pub fn map_to_rates(grid: &IntensityGrid, max_freq_hz: f64) -> Result<RateGrid> {
    if !max_freq_hz.is_finite() || max_freq_hz <= 0.0 {
        return Err(EncodeError::invalid_config("max_freq_hz", max_freq_hz, "> 0"));
    }

    let max_value = grid.max_value() as f64;
    let rates = grid
        .view()
        .mapv(|v| (max_freq_hz * (v as f64 / max_value)).clamp(0.0, max_freq_hz));

    Ok(RateGrid::from_array(rates))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> IntensityGrid {
        IntensityGrid::from_rows(vec![vec![0.0, 255.0], vec![127.5, 51.0]], 255.0).unwrap()
    }

    #[test]
    fn test_linear_mapping() {
        let rates = map_to_rates(&grid(), 1000.0).unwrap();
        let values: Vec<f64> = rates.iter().collect();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 1000.0);
        assert!((values[2] - 500.0).abs() < 1e-9);
        assert!((values[3] - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_preserved() {
        let rates = map_to_rates(&grid(), 50.0).unwrap();
        assert_eq!(rates.shape(), (2, 2));
        assert!(rates.iter().all(|r| (0.0..=50.0).contains(&r)));
    }

    #[test]
    fn test_custom_range() {
        let grid = IntensityGrid::from_rows(vec![vec![0.5, 1.0]], 1.0).unwrap();
        let rates = map_to_rates(&grid, 100.0).unwrap();
        assert_eq!(rates.iter().collect::<Vec<_>>(), vec![50.0, 100.0]);
    }

    #[test]
    fn test_invalid_max_freq() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = map_to_rates(&grid(), bad).unwrap_err();
            assert!(err.is_config_error(), "{} should be rejected", bad);
        }
    }
}
