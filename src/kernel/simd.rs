//! SIMD squared-distance sums using the `wide` crate.
//!
//! Two 4-byte pixels are processed per `i32x8`. Lanes past the color channels
//! are masked out, and the per-pixel sums stay exact integers, so results are
//! identical to the scalar path.

use std::ops::ControlFlow;

use crate::kernel::distance::squared_distance;
use wide::i32x8;

/// Pixel size handled by the vector path.
pub(crate) const PIXEL_BYTES: usize = 4;

const LANES: usize = 8;

#[inline]
fn load_u8x8(slice: &[u8]) -> i32x8 {
    i32x8::from([
        slice[0] as i32,
        slice[1] as i32,
        slice[2] as i32,
        slice[3] as i32,
        slice[4] as i32,
        slice[5] as i32,
        slice[6] as i32,
        slice[7] as i32,
    ])
}

#[inline]
fn color_mask(channels: usize) -> i32x8 {
    let mut lanes = [0i32; LANES];
    for (idx, lane) in lanes.iter_mut().enumerate() {
        if idx % PIXEL_BYTES < channels {
            *lane = 1;
        }
    }
    i32x8::from(lanes)
}

/// Calls `f` with the squared color distance of each RGBA pixel pair.
pub(crate) fn for_each_squared_rgba<F>(
    hay: &[u8],
    tpl: &[u8],
    channels: usize,
    mut f: F,
) -> ControlFlow<()>
where
    F: FnMut(u32) -> ControlFlow<()>,
{
    let mask = color_mask(channels);
    let hay_chunks = hay.chunks_exact(LANES);
    let tpl_chunks = tpl.chunks_exact(LANES);
    let hay_rest = hay_chunks.remainder();
    let tpl_rest = tpl_chunks.remainder();

    for (a, b) in hay_chunks.zip(tpl_chunks) {
        let diff = load_u8x8(a) - load_u8x8(b);
        let sq = (diff * diff * mask).to_array();
        let first = (sq[0] + sq[1] + sq[2] + sq[3]) as u32;
        let second = (sq[4] + sq[5] + sq[6] + sq[7]) as u32;
        if f(first).is_break() || f(second).is_break() {
            return ControlFlow::Break(());
        }
    }

    for (a, b) in hay_rest
        .chunks_exact(PIXEL_BYTES)
        .zip(tpl_rest.chunks_exact(PIXEL_BYTES))
    {
        if f(squared_distance(&a[..channels], &b[..channels])).is_break() {
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}
