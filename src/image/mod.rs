//! Raster views and pixel buffers.
//!
//! `RasterView` is a borrowed 2D view into a 1D byte buffer with an explicit
//! stride. The stride counts bytes between the starts of consecutive rows, so
//! a stride larger than `width * bytes_per_pixel` represents padded rows.
//! Padding bytes are never read by the matching predicates. ROI slices are
//! zero-copy views into the same backing slice and retain the original stride.

use crate::util::{SearchError, SearchResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod raster;

pub use raster::RasterBuffer;

/// Byte layout of a single pixel.
///
/// The first `color_channels` bytes of a pixel carry color; any trailing bytes
/// (usually alpha) take part in exact comparison but not in color distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelLayout {
    bytes_per_pixel: usize,
    color_channels: usize,
}

impl PixelLayout {
    /// 8-bit RGBA, the format produced by the image loader.
    pub const RGBA8: Self = Self {
        bytes_per_pixel: 4,
        color_channels: 3,
    };

    /// 8-bit grayscale without alpha.
    pub const GRAY8: Self = Self {
        bytes_per_pixel: 1,
        color_channels: 1,
    };

    /// Creates a layout, rejecting zero-sized pixels and color channel counts
    /// larger than the pixel.
    pub fn new(bytes_per_pixel: usize, color_channels: usize) -> SearchResult<Self> {
        if bytes_per_pixel == 0 || color_channels == 0 || color_channels > bytes_per_pixel {
            return Err(SearchError::InvalidLayout {
                bytes_per_pixel,
                color_channels,
            });
        }
        Ok(Self {
            bytes_per_pixel,
            color_channels,
        })
    }

    /// Returns the number of bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Returns the number of leading color bytes per pixel.
    pub fn color_channels(&self) -> usize {
        self.color_channels
    }
}

impl Default for PixelLayout {
    fn default() -> Self {
        Self::RGBA8
    }
}

/// Borrowed raster view with an explicit byte stride.
#[derive(Copy, Clone, Debug)]
pub struct RasterView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    layout: PixelLayout,
}

impl<'a> RasterView<'a> {
    /// Creates a tightly packed view with `stride == width * bytes_per_pixel`.
    pub fn from_packed(
        data: &'a [u8],
        width: usize,
        height: usize,
        layout: PixelLayout,
    ) -> SearchResult<Self> {
        let stride = width
            .checked_mul(layout.bytes_per_pixel)
            .ok_or(SearchError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, stride, layout)
    }

    /// Creates a view with an explicit stride in bytes.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        layout: PixelLayout,
    ) -> SearchResult<Self> {
        let needed = required_len(width, height, stride, layout)?;
        if data.len() < needed {
            return Err(SearchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            layout,
        })
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in bytes between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the pixel layout.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Returns the number of bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        self.layout.bytes_per_pixel
    }

    /// Returns the number of pixel bytes in a row, excluding padding.
    pub fn row_bytes(&self) -> usize {
        self.width * self.layout.bytes_per_pixel
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the pixel bytes of row `y`, without padding.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.row_bytes())?;
        self.data.get(start..end)
    }

    /// Returns the bytes of the pixel at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [u8]> {
        if x >= self.width {
            return None;
        }
        let bpp = self.layout.bytes_per_pixel;
        let start = x * bpp;
        self.row(y)?.get(start..start + bpp)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> SearchResult<RasterView<'a>> {
        if width == 0 || height == 0 {
            return Err(SearchError::InvalidDimensions { width, height });
        }
        let fits_x = x.checked_add(width).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|end| end <= self.height);
        if !fits_x || !fits_y {
            return Err(SearchError::InvalidInput("roi exceeds raster bounds"));
        }

        let start = y * self.stride + x * self.layout.bytes_per_pixel;
        let data = self
            .data
            .get(start..)
            .ok_or(SearchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;
        RasterView::new(data, width, height, self.stride, self.layout)
    }

    /// Copies the view into a tightly packed owned buffer.
    pub fn to_buffer(&self) -> RasterBuffer {
        let row_bytes = self.row_bytes();
        let mut data = Vec::with_capacity(row_bytes * self.height);
        for y in 0..self.height {
            let start = y * self.stride;
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        RasterBuffer::from_parts(data, self.width, self.height, row_bytes, self.layout)
    }
}

fn required_len(
    width: usize,
    height: usize,
    stride: usize,
    layout: PixelLayout,
) -> SearchResult<usize> {
    if width == 0 || height == 0 {
        return Err(SearchError::InvalidDimensions { width, height });
    }
    let row_bytes = width
        .checked_mul(layout.bytes_per_pixel)
        .ok_or(SearchError::InvalidDimensions { width, height })?;
    if stride < row_bytes {
        return Err(SearchError::InvalidStride {
            width: row_bytes,
            stride,
        });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_bytes))
        .ok_or(SearchError::InvalidDimensions { width, height })
}
