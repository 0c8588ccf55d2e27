//! SVG raster plots of encoded spike trains

use std::path::Path;

use pixspike_core::SpikeCollection;

use crate::error::{CliError, CliResult};

/// Plot size in pixels
pub const RASTER_SIZE: (u32, u32) = (1024, 768);

/// Render one dot per spike: time on x, neuron index on y
#[cfg(feature = "visualization")]
pub fn render_raster(collection: &SpikeCollection, path: &Path, title: &str) -> CliResult<()> {
    use plotters::prelude::*;

    fn plot_err(e: impl std::fmt::Display) -> CliError {
        CliError::Generic(anyhow::anyhow!("raster plot: {}", e))
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let duration = collection.duration_ms();
    let neurons = collection.len() as f64;
    let window = collection.window();

    let root = SVGBackend::new(path, RASTER_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..duration, -0.5f64..(neurons - 0.5))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time (ms)")
        .y_desc("Neuron")
        .disable_mesh()
        .draw()
        .map_err(plot_err)?;

    // Shade ON windows when more than one stimulus was presented
    if collection.stimulus_count() > 1 {
        chart
            .draw_series((0..collection.stimulus_count()).map(|k| {
                let start = window.period_ms() * k as f64;
                Rectangle::new(
                    [(start, -0.5), (start + window.on_ms, neurons - 0.5)],
                    RGBColor(235, 240, 250).filled(),
                )
            }))
            .map_err(plot_err)?;
    }

    chart
        .draw_series(
            collection
                .export_spikes()
                .into_iter()
                .map(|(t, neuron)| Circle::new((t, neuron as f64), 1, BLACK.filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Plotting needs the `visualization` feature
#[cfg(not(feature = "visualization"))]
pub fn render_raster(_collection: &SpikeCollection, path: &Path, _title: &str) -> CliResult<()> {
    Err(CliError::config(format!(
        "cannot write {}: pixspike was built without the `visualization` feature",
        path.display()
    )))
}

#[cfg(all(test, feature = "visualization"))]
mod tests {
    use super::*;
    use pixspike_core::{encode_image, EncoderConfig, IntensityGrid};

    #[test]
    fn test_raster_written_as_svg() {
        let grid = IntensityGrid::from_u8(&[255, 128, 0, 255], 2, 2).unwrap();
        let collection = encode_image(&grid, &EncoderConfig::default().with_seed(3)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots").join("raster_plot_test.svg");

        render_raster(&collection, &path, "test").unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<circle"));
    }
}
