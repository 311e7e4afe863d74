// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a finished histogram into grayscale pixels.
//!
//! Brightness is scaled against a fixed cap rather than the brightest
//! bucket actually observed, so a given density always renders at the
//! same gray no matter which part of the diagram is being drawn.
//! Anything at or above the cap is pure white.

use itertools::iproduct;
use num::clamp;

use histogram::HistogramGrid;

/// Brightest possible pixel.
pub const WHITE: u8 = 255;
/// The background.  Empty buckets stay this color.
pub const BLACK: u8 = 0;

/// Maps a bucket count to a gray level against a fixed saturation
/// cap.  Monotonic in `count`, zero for zero, `WHITE` at the cap.
#[inline]
pub fn intensity(count: u32, cap: u32) -> u8 {
    if count == 0 || cap == 0 {
        return BLACK;
    }
    let points = u64::from(count.min(cap));
    clamp(points * u64::from(WHITE) / u64::from(cap), 0, u64::from(WHITE)) as u8
}

/// An 8-bit grayscale image, stored row-major with the top row first,
/// which is the order image encoders want.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelGrid {
    /// An all-black grid.
    pub fn new(width: usize, height: usize) -> Self {
        PixelGrid {
            width,
            height,
            pixels: vec![BLACK; width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The gray level at (x, y), with y = 0 the top row.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    /// The raw pixel buffer.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the grid, returning the raw pixel buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

/// Renders `grid` against the saturation cap `max_points_per_pixel`.
/// Histogram row 0 is the bottom of the image, so the rows are flipped
/// on the way through.
pub fn rasterize(grid: &HistogramGrid, max_points_per_pixel: u32) -> PixelGrid {
    let (width, height) = (grid.width(), grid.height());
    let mut pixels = PixelGrid::new(width, height);
    for (y, x) in iproduct!(0..height, 0..width) {
        let count = grid.get(x, height - 1 - y);
        if count == 0 {
            continue;
        }
        pixels.pixels[y * width + x] = intensity(count, max_points_per_pixel);
    }
    pixels
}
