use imgsearch::{
    Aggregation, Algorithm, DistanceConfig, MatchPoint, PixelLayout, RasterBuffer, SearchConfig,
    Searcher,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_image(rng: &mut StdRng, width: usize, height: usize, levels: u8) -> RasterBuffer {
    let mut data = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        // Few distinct levels so accidental repeats of small needles occur.
        let r = rng.random_range(0..levels);
        let g = rng.random_range(0..levels);
        data.extend_from_slice(&[r * 40, g * 40, 0, 255]);
    }
    RasterBuffer::from_packed(data, width, height, PixelLayout::RGBA8).unwrap()
}

fn search(
    haystack: &RasterBuffer,
    needle: &RasterBuffer,
    workers: usize,
    algorithm: Algorithm,
) -> Vec<MatchPoint> {
    Searcher::new()
        .with_config(SearchConfig {
            workers,
            algorithm,
            ..SearchConfig::default()
        })
        .find_all(haystack.view(), needle.view())
        .unwrap()
}

#[test]
fn exact_match_is_reflexive() {
    let mut rng = StdRng::seed_from_u64(1);
    let image = random_image(&mut rng, 23, 17, 6);
    for workers in [1, 3, 8] {
        assert_eq!(
            search(&image, &image, workers, Algorithm::Exact),
            vec![MatchPoint { x: 0, y: 0 }]
        );
    }
}

#[test]
fn extracted_needle_is_found_for_any_worker_count() {
    let mut rng = StdRng::seed_from_u64(2);
    let haystack = random_image(&mut rng, 40, 31, 4);

    for _ in 0..8 {
        let width = rng.random_range(1..6);
        let height = rng.random_range(1..6);
        let px = rng.random_range(0..=haystack.width() - width);
        let py = rng.random_range(0..=haystack.height() - height);
        let needle = haystack.view().roi(px, py, width, height).unwrap().to_buffer();

        let reference = search(&haystack, &needle, 1, Algorithm::Exact);
        assert!(reference.contains(&MatchPoint { x: px, y: py }));

        for workers in [2, 5, 16, 64] {
            assert_eq!(
                search(&haystack, &needle, workers, Algorithm::Exact),
                reference,
                "workers = {workers}"
            );
        }
    }
}

#[test]
fn euclidean_match_set_is_independent_of_worker_count() {
    let mut rng = StdRng::seed_from_u64(3);
    let haystack = random_image(&mut rng, 32, 24, 3);
    let needle = haystack.view().roi(10, 7, 3, 2).unwrap().to_buffer();

    for aggregation in [Aggregation::Sum, Aggregation::Mean, Aggregation::Max] {
        let cfg = |workers| SearchConfig {
            workers,
            algorithm: Algorithm::Euclidean,
            distance: DistanceConfig {
                aggregation,
                tolerance: 45.0,
            },
        };
        let reference = Searcher::new()
            .with_config(cfg(1))
            .find_all(haystack.view(), needle.view())
            .unwrap();
        assert!(reference.contains(&MatchPoint { x: 10, y: 7 }));

        for workers in [3, 7, 32] {
            let got = Searcher::new()
                .with_config(cfg(workers))
                .find_all(haystack.view(), needle.view())
                .unwrap();
            assert_eq!(got, reference, "{aggregation:?} with {workers} workers");
        }
    }
}

#[test]
fn strict_euclidean_agrees_with_exact_on_opaque_images() {
    let mut rng = StdRng::seed_from_u64(4);
    let haystack = random_image(&mut rng, 20, 20, 2);
    let needle = haystack.view().roi(4, 9, 2, 2).unwrap().to_buffer();

    assert_eq!(
        search(&haystack, &needle, 4, Algorithm::Euclidean),
        search(&haystack, &needle, 4, Algorithm::Exact)
    );
}

#[test]
fn padded_stride_gives_same_matches() {
    let mut rng = StdRng::seed_from_u64(5);
    let haystack = random_image(&mut rng, 19, 13, 3);
    let needle = haystack.view().roi(6, 4, 3, 3).unwrap().to_buffer();

    let padded_haystack = RasterBuffer::with_row_alignment(haystack.view(), 64).unwrap();
    let padded_needle = RasterBuffer::with_row_alignment(needle.view(), 32).unwrap();
    assert!(padded_haystack.stride() > haystack.stride());

    for algorithm in [Algorithm::Exact, Algorithm::Euclidean] {
        assert_eq!(
            search(&padded_haystack, &padded_needle, 3, algorithm),
            search(&haystack, &needle, 3, algorithm)
        );
    }
}
