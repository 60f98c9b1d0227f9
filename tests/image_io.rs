#![cfg(feature = "image-io")]

use std::borrow::Cow;

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use imgsearch::io::{load_rgba, raster_view, rgba_from_dynamic};
use imgsearch::{MatchPoint, PixelLayout, SearchConfig, SearchError, Searcher};

#[test]
fn rgba_images_are_borrowed_without_copy() {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4])));
    assert!(matches!(rgba_from_dynamic(&img), Cow::Borrowed(_)));
}

#[test]
fn other_formats_are_converted_to_opaque_rgba() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])));
    let rgba = rgba_from_dynamic(&img);
    assert!(matches!(rgba, Cow::Owned(_)));

    let view = raster_view(&rgba).unwrap();
    assert_eq!(view.layout(), PixelLayout::RGBA8);
    assert_eq!(view.stride(), 8);
    assert_eq!(view.pixel(1, 1).unwrap(), &[10, 20, 30, 255]);
}

#[test]
fn missing_file_reports_path() {
    let err = load_rgba("does/not/exist.png").unwrap_err();
    assert_eq!(
        err,
        SearchError::ImageNotFound {
            path: "does/not/exist.png".to_string(),
        }
    );
}

#[test]
fn undecodable_file_reports_path() {
    let path = std::env::temp_dir().join(format!("imgsearch-garbage-{}.png", std::process::id()));
    std::fs::write(&path, b"definitely not a png").unwrap();
    let err = load_rgba(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    match err {
        SearchError::ImageIo { path: reported, .. } => {
            assert_eq!(reported, path.display().to_string())
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn round_trips_png_through_search() {
    let mut haystack = RgbaImage::from_pixel(8, 6, Rgba([200, 0, 0, 255]));
    haystack.put_pixel(5, 3, Rgba([0, 0, 200, 255]));
    let needle = RgbImage::from_pixel(1, 1, Rgb([0, 0, 200]));

    let dir = std::env::temp_dir();
    let id = std::process::id();
    let hay_path = dir.join(format!("imgsearch-hay-{id}.png"));
    let needle_path = dir.join(format!("imgsearch-needle-{id}.png"));
    haystack.save(&hay_path).unwrap();
    needle.save(&needle_path).unwrap();

    let hay = load_rgba(&hay_path).unwrap();
    let tpl = load_rgba(&needle_path).unwrap();
    std::fs::remove_file(&hay_path).ok();
    std::fs::remove_file(&needle_path).ok();

    let matches = Searcher::new()
        .with_config(SearchConfig {
            workers: 3,
            ..SearchConfig::default()
        })
        .find_all(raster_view(&hay).unwrap(), raster_view(&tpl).unwrap())
        .unwrap();
    assert_eq!(matches, vec![MatchPoint { x: 5, y: 3 }]);
}
