//! Spike array inspection command

use std::path::PathBuf;

use clap::Args;
use pixspike_core::{NeuronId, SpikeCollection};
use tracing::info;

use crate::error::CliResult;
use crate::output::{OutputFormat, SpikeArrayFile};

/// Summarize a spike array file
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Spike array file (.json or .bin)
    pub input: PathBuf,

    /// Input format, when the extension is not .json or .bin
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print the busiest neurons
    #[arg(long, default_value = "0")]
    pub top: usize,
}

impl InspectCommand {
    pub fn execute(self) -> CliResult<()> {
        info!("Inspecting {}", self.input.display());
        let file = SpikeArrayFile::read(&self.input, self.format)?;
        let collection = file.to_collection()?;

        println!("{}", summary(&file, &collection));
        if self.top > 0 {
            println!("Busiest neurons:");
            for (id, row, col, count, rate) in busiest(&collection, self.top) {
                println!("  {} (row {}, col {}): {} spikes, {:.1} Hz", id, row, col, count, rate);
            }
        }
        Ok(())
    }
}

fn summary(file: &SpikeArrayFile, collection: &SpikeCollection) -> String {
    let window = collection.window();
    let seed = file
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    let max_rate = collection
        .iter()
        .filter_map(|(id, _)| collection.firing_rate_hz(id))
        .fold(0.0f64, f64::max);

    format!(
        "Source:          {}\n\
         Shape:           {}x{} ({} neurons)\n\
         Stimuli:         {}\n\
         Window:          {} ms ON / {} ms OFF ({} ms total)\n\
         Max frequency:   {} Hz\n\
         Seed:            {}\n\
         Total spikes:    {}\n\
         Active neurons:  {}\n\
         Mean rate:       {:.2} Hz\n\
         Peak rate:       {:.2} Hz",
        file.source.join(", "),
        collection.height(),
        collection.width(),
        collection.len(),
        collection.stimulus_count(),
        window.on_ms,
        window.off_ms,
        collection.duration_ms(),
        file.max_freq_hz,
        seed,
        collection.total_spikes(),
        collection.active_neurons(),
        collection.mean_firing_rate_hz(),
        max_rate,
    )
}

fn busiest(collection: &SpikeCollection, n: usize) -> Vec<(NeuronId, usize, usize, usize, f64)> {
    let mut neurons: Vec<(NeuronId, usize)> = collection
        .iter()
        .map(|(id, train)| (id, train.len()))
        .collect();
    neurons.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    neurons
        .into_iter()
        .take(n)
        .map(|(id, count)| {
            let (row, col) = id.position(collection.width());
            let rate = collection.firing_rate_hz(id).unwrap_or(0.0);
            (id, row, col, count, rate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixspike_core::{encode_image, EncoderConfig, IntensityGrid};

    #[test]
    fn test_busiest_orders_by_count() {
        let grid = IntensityGrid::from_u8(&[0, 255, 0, 0], 2, 2).unwrap();
        let config = EncoderConfig::default().with_seed(11);
        let collection = encode_image(&grid, &config).unwrap();

        let top = busiest(&collection, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, NeuronId::new(1));
        assert_eq!((top[0].1, top[0].2), (0, 1));
        assert!(top[0].3 > 100);
        assert_eq!(top[1].3, 0);
    }

    #[test]
    fn test_summary_mentions_shape() {
        let grid = IntensityGrid::from_u8(&[255; 6], 2, 3).unwrap();
        let config = EncoderConfig::default().with_seed(2);
        let collection = encode_image(&grid, &config).unwrap();
        let file = SpikeArrayFile::from_collection(vec!["x.png".into()], &collection, &config);

        let text = summary(&file, &collection);
        assert!(text.contains("2x3 (6 neurons)"));
        assert!(text.contains("Seed:            2"));
        assert!(text.contains("x.png"));
    }
}
