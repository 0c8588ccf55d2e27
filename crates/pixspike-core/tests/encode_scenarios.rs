//! End-to-end encoding scenarios on small images

use pixspike_core::{
    encode_image, expected_spike_count, EncodeError, EncoderConfig, ImageEncoder, IntensityGrid,
    NeuronId,
};

fn two_by_two() -> IntensityGrid {
    IntensityGrid::from_rows(vec![vec![0.0, 255.0], vec![128.0, 255.0]], 255.0).unwrap()
}

#[test]
fn two_by_two_image_scenario() {
    let config = EncoderConfig::new(1000.0, 200.0, 100.0).unwrap().with_seed(2024);
    let spikes = encode_image(&two_by_two(), &config).unwrap();

    assert_eq!(spikes.len(), 4);
    assert!(spikes.train(NeuronId::new(0)).unwrap().is_empty());

    // 200 expected spikes, sigma ~14.1; 5 sigma keeps this robust to the seed
    for bright in [1, 3] {
        let count = spikes.train(NeuronId::new(bright)).unwrap().len() as f64;
        assert!((count - 200.0).abs() < 5.0 * 200f64.sqrt(), "neuron {} fired {}", bright, count);
    }

    let half = expected_spike_count(1000.0 * 128.0 / 255.0, 200.0);
    let count = spikes.train(NeuronId::new(2)).unwrap().len() as f64;
    assert!((count - half).abs() < 5.0 * half.sqrt(), "neuron 2 fired {}", count);

    for (_, train) in spikes.iter() {
        assert!(train.times().iter().all(|&t| (0.0..200.0).contains(&t)));
        assert!(train.times().windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn zero_max_freq_is_invalid_config() {
    let config = EncoderConfig {
        max_freq_hz: 0.0,
        ..Default::default()
    };
    let err = encode_image(&two_by_two(), &config).unwrap_err();
    assert!(matches!(err, EncodeError::InvalidConfig { ref parameter, .. } if parameter == "max_freq_hz"));
}

#[test]
fn one_millisecond_window_stays_small() {
    let grid = IntensityGrid::from_u8(&[255; 32 * 32], 32, 32).unwrap();
    let config = EncoderConfig::new(1000.0, 1.0, 0.0).unwrap().with_seed(99);
    let spikes = encode_image(&grid, &config).unwrap();

    assert_eq!(spikes.len(), 1024);
    for (_, train) in spikes.iter() {
        assert!(train.len() <= 12, "expected about one spike, got {}", train.len());
        assert!(train.times().iter().all(|&t| (0.0..1.0).contains(&t)));
    }
}

#[test]
fn default_size_image_needs_no_extra_config() {
    let pixels: Vec<u8> = (0..32 * 32).map(|i| (i % 256) as u8).collect();
    let grid = IntensityGrid::from_u8(&pixels, 32, 32).unwrap();
    let spikes = encode_image(&grid, &EncoderConfig::default()).unwrap();
    assert_eq!(spikes.len(), 32 * 32);
    assert_eq!(spikes.shape(), (32, 32));
}

#[test]
fn oversized_image_fails_instead_of_truncating() {
    let grid = IntensityGrid::from_u8(&[128; 64], 8, 8).unwrap();
    let config = EncoderConfig::default().with_max_neurons(32);
    let err = encode_image(&grid, &config).unwrap_err();
    assert_eq!(err, EncodeError::UnsupportedSize { neurons: 64, limit: 32 });

    let spikes = encode_image(&grid, &config.allow_large(true)).unwrap();
    assert_eq!(spikes.len(), 64);
}

#[test]
fn seeded_encoder_is_deterministic() {
    let encoder = ImageEncoder::new(EncoderConfig::default().with_seed(31337)).unwrap();
    let a = encoder.encode(&two_by_two()).unwrap();
    let b = encoder.encode(&two_by_two()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.export_spikes(), b.export_spikes());
}

#[test]
fn unseeded_calls_are_independent() {
    let encoder = ImageEncoder::new(EncoderConfig::default()).unwrap();
    let a = encoder.encode(&two_by_two()).unwrap();
    let b = encoder.encode(&two_by_two()).unwrap();
    assert_ne!(a, b);
}

#[test]
fn sequence_offsets_by_period() {
    let config = EncoderConfig::new(1000.0, 200.0, 100.0).unwrap().with_seed(5);
    let encoder = ImageEncoder::new(config).unwrap();
    let spikes = encoder.encode_sequence(&[two_by_two(), two_by_two()]).unwrap();

    assert_eq!(spikes.len(), 4);
    assert_eq!(spikes.duration_ms(), 600.0);
    let train = spikes.train(NeuronId::new(1)).unwrap();
    assert!(train.times().iter().any(|&t| t < 200.0));
    assert!(train.times().iter().any(|&t| t >= 300.0));
    assert!(train.times().iter().all(|&t| t < 200.0 || (300.0..500.0).contains(&t)));
}

#[test]
fn extreme_max_freq_is_rejected_not_sampled() {
    let grid = IntensityGrid::from_u8(&[255], 1, 1).unwrap();
    let config = EncoderConfig {
        max_freq_hz: 1e20,
        on_duration_ms: 200.0,
        off_duration_ms: 0.0,
        seed: Some(1),
        ..Default::default()
    };
    let err = encode_image(&grid, &config).unwrap_err();
    assert!(matches!(err, EncodeError::InvalidConfig { ref parameter, .. } if parameter == "max_freq_hz"));
    assert!(EncoderConfig::new(1e20, 200.0, 0.0).is_err());
}

#[test]
fn off_duration_does_not_move_single_image_spikes() {
    let short_off = EncoderConfig::new(1000.0, 200.0, 0.0).unwrap().with_seed(31);
    let long_off = EncoderConfig::new(1000.0, 200.0, 5000.0).unwrap().with_seed(31);

    let a = encode_image(&two_by_two(), &short_off).unwrap();
    let b = encode_image(&two_by_two(), &long_off).unwrap();

    assert_eq!(a.trains(), b.trains());
    assert_eq!(b.window().off_ms, 5000.0);
    assert!(b.trains().iter().all(|t| t.last().map_or(true, |last| last < 200.0)));
}

#[test]
fn unseeded_encode_reports_its_seed() {
    let config = EncoderConfig::default();
    let first = encode_image(&two_by_two(), &config).unwrap();
    let seed = first.seed().expect("generated collections carry their seed");

    let again = encode_image(&two_by_two(), &config.clone().with_seed(seed)).unwrap();
    assert_eq!(first.trains(), again.trains());
    assert_eq!(again.seed(), Some(seed));
}
