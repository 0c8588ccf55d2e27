use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pixspike_core::{encode_image, EncoderConfig, IntensityGrid, SamplingMethod};

fn gradient(side: usize) -> IntensityGrid {
    let pixels: Vec<u8> = (0..side * side)
        .map(|i| ((i % side) * 255 / side.max(1)) as u8)
        .collect();
    IntensityGrid::from_u8(&pixels, side, side).expect("bench grid")
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixspike_encode");

    for &side in &[32usize, 128usize] {
        let grid = gradient(side);
        group.throughput(Throughput::Elements((side * side) as u64));

        let exponential = EncoderConfig::default().with_seed(1234);
        group.bench_with_input(BenchmarkId::new("exponential", side), &grid, |b, grid| {
            b.iter(|| encode_image(grid, &exponential).unwrap());
        });

        // Keep binned sampling to the default size; it draws once per bin
        if side <= 32 {
            let binned = EncoderConfig::default()
                .with_seed(1234)
                .with_method(SamplingMethod::millisecond_bins());
            group.bench_with_input(BenchmarkId::new("binned_1ms", side), &grid, |b, grid| {
                b.iter(|| encode_image(grid, &binned).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
