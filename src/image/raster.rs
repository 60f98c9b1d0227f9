//! Owned pixel buffers.
//!
//! A `RasterBuffer` always satisfies `data.len() == stride * height`, including
//! the padding of the last row, so it can stand in for bitmap memory handed
//! over by image decoders that align rows.

use crate::image::{PixelLayout, RasterView};
use crate::util::{SearchError, SearchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Owned raster with an explicit byte stride.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
    stride: usize,
    layout: PixelLayout,
}

impl RasterBuffer {
    /// Wraps an existing buffer. `data.len()` must equal `stride * height`.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        stride: usize,
        layout: PixelLayout,
    ) -> SearchResult<Self> {
        // Validates dimensions and stride.
        RasterView::new(&data, width, height, stride, layout)?;
        let expected = stride
            .checked_mul(height)
            .ok_or(SearchError::InvalidDimensions { width, height })?;
        if data.len() < expected {
            return Err(SearchError::BufferTooSmall {
                needed: expected,
                got: data.len(),
            });
        }
        if data.len() > expected {
            return Err(SearchError::InvalidInput(
                "buffer length must equal stride * height",
            ));
        }
        Ok(Self::from_parts(data, width, height, stride, layout))
    }

    /// Wraps a tightly packed buffer with `stride == width * bytes_per_pixel`.
    pub fn from_packed(
        data: Vec<u8>,
        width: usize,
        height: usize,
        layout: PixelLayout,
    ) -> SearchResult<Self> {
        let stride = width
            .checked_mul(layout.bytes_per_pixel())
            .ok_or(SearchError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, stride, layout)
    }

    /// Creates a packed buffer where every pixel holds `pixel`.
    pub fn filled(
        width: usize,
        height: usize,
        layout: PixelLayout,
        pixel: &[u8],
    ) -> SearchResult<Self> {
        if pixel.len() != layout.bytes_per_pixel() {
            return Err(SearchError::InvalidInput(
                "fill pixel must have bytes_per_pixel bytes",
            ));
        }
        let count = width
            .checked_mul(height)
            .ok_or(SearchError::InvalidDimensions { width, height })?;
        let data = pixel.repeat(count);
        Self::from_packed(data, width, height, layout)
    }

    /// Copies `view` into a new buffer whose stride is rounded up to a
    /// multiple of `alignment` bytes. Padding bytes are zero.
    pub fn with_row_alignment(view: RasterView<'_>, alignment: usize) -> SearchResult<Self> {
        if alignment == 0 {
            return Err(SearchError::InvalidInput("row alignment must be at least 1"));
        }
        let row_bytes = view.row_bytes();
        let stride = row_bytes.next_multiple_of(alignment);
        let len = stride
            .checked_mul(view.height())
            .ok_or(SearchError::InvalidDimensions {
                width: view.width(),
                height: view.height(),
            })?;
        let mut data = vec![0u8; len];

        #[cfg(feature = "rayon")]
        data.par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, dst)| copy_row(view, y, &mut dst[..row_bytes]));

        #[cfg(not(feature = "rayon"))]
        data.chunks_mut(stride)
            .enumerate()
            .for_each(|(y, dst)| copy_row(view, y, &mut dst[..row_bytes]));

        Ok(Self::from_parts(
            data,
            view.width(),
            view.height(),
            stride,
            view.layout(),
        ))
    }

    pub(crate) fn from_parts(
        data: Vec<u8>,
        width: usize,
        height: usize,
        stride: usize,
        layout: PixelLayout,
    ) -> Self {
        Self {
            data,
            width,
            height,
            stride,
            layout,
        }
    }

    /// Returns a borrowed view of the buffer.
    pub fn view(&self) -> RasterView<'_> {
        RasterView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            layout: self.layout,
        }
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the pixel layout.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Returns the raw bytes, padding included.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns mutable bytes of the pixel at `(x, y)`.
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Option<&mut [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.layout.bytes_per_pixel();
        let start = y * self.stride + x * bpp;
        self.data.get_mut(start..start + bpp)
    }

    /// Consumes the buffer and returns the raw bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

fn copy_row(view: RasterView<'_>, y: usize, dst: &mut [u8]) {
    if let Some(src) = view.row(y) {
        dst.copy_from_slice(src);
    }
}
