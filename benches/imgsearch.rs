use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use imgsearch::{
    Aggregation, Algorithm, DistanceConfig, PixelLayout, RasterBuffer, SearchConfig, Searcher,
};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> RasterBuffer {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.extend_from_slice(&[value as u8, (value >> 1) as u8, (x & 0xFF) as u8, 255]);
        }
    }
    RasterBuffer::from_packed(data, width, height, PixelLayout::RGBA8).unwrap()
}

fn bench_search(c: &mut Criterion) {
    let haystack = make_image(320, 240);
    let needle = haystack.view().roi(150, 90, 24, 16).unwrap().to_buffer();

    let mut group = c.benchmark_group("find_all");
    for workers in [1usize, 4] {
        let exact = Searcher::new().with_config(SearchConfig {
            workers,
            algorithm: Algorithm::Exact,
            ..SearchConfig::default()
        });
        group.bench_with_input(BenchmarkId::new("exact", workers), &exact, |b, s| {
            b.iter(|| black_box(s.find_all(haystack.view(), needle.view()).unwrap()));
        });

        let euclidean = Searcher::new().with_config(SearchConfig {
            workers,
            algorithm: Algorithm::Euclidean,
            distance: DistanceConfig {
                aggregation: Aggregation::Mean,
                tolerance: 4.0,
            },
        });
        group.bench_with_input(
            BenchmarkId::new("euclidean_mean", workers),
            &euclidean,
            |b, s| {
                b.iter(|| black_box(s.find_all(haystack.view(), needle.view()).unwrap()));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
