//! Pixel buffer extraction from images decoded by the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Everything is normalized
//! to 8-bit RGBA so haystack and needle always share `PixelLayout::RGBA8`.

use crate::image::{PixelLayout, RasterView};
use crate::util::{SearchError, SearchResult};
use image::{DynamicImage, RgbaImage};
use std::borrow::Cow;
use std::path::Path;

/// Returns the image as RGBA8, borrowing it when no conversion is needed.
pub fn rgba_from_dynamic(img: &DynamicImage) -> Cow<'_, RgbaImage> {
    match img.as_rgba8() {
        Some(rgba) => Cow::Borrowed(rgba),
        None => Cow::Owned(img.to_rgba8()),
    }
}

/// Creates a borrowed raster view over an RGBA8 image.
pub fn raster_view(img: &RgbaImage) -> SearchResult<RasterView<'_>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    RasterView::from_packed(img.as_raw(), width, height, PixelLayout::RGBA8)
}

/// Loads an image from disk and converts it to RGBA8.
pub fn load_rgba<P: AsRef<Path>>(path: P) -> SearchResult<RgbaImage> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(SearchError::ImageNotFound {
            path: path.display().to_string(),
        });
    }
    let img = image::open(path).map_err(|err| SearchError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    // `into_rgba8` hands back RGBA8 images without copying.
    Ok(img.into_rgba8())
}
