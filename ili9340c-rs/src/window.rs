// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files License-MIT.txt and License-Apache-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Addressing windows and pixel streams

use crate::Error;

/// Number of pixels sent per bus write when filling
pub const CHUNK_PIXELS: usize = 64;

/// An inclusive pixel rectangle, checked against the panel dimensions
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Window {
    /// First column
    x0: u16,

    /// First row
    y0: u16,

    /// Last column
    x1: u16,

    /// Last row
    y1: u16,
}

impl Window {
    /// Create a window inside a panel of the given logical size
    ///
    /// # Errors
    ///
    /// Returns an error if the window is reversed or reaches past the panel.
    pub const fn new(
        (x0, y0, x1, y1): (u16, u16, u16, u16),
        (width, height): (u16, u16),
    ) -> Result<Self, Error> {
        if x0 > x1 || y0 > y1 || x1 >= width || y1 >= height {
            return Err(Error::InvalidWindow);
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Create a window covering the whole panel
    pub const fn full((width, height): (u16, u16)) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width.saturating_sub(1),
            y1: height.saturating_sub(1),
        }
    }

    /// Create a 1×1 window around a pixel
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel lies outside the panel.
    pub const fn pixel(x: u16, y: u16, (width, height): (u16, u16)) -> Result<Self, Error> {
        if x >= width || y >= height {
            return Err(Error::OutOfBounds);
        }
        Ok(Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        })
    }

    /// Column address range, big-endian
    pub const fn columns(&self) -> [u8; 4] {
        range_bytes(self.x0, self.x1)
    }

    /// Row address range, big-endian
    pub const fn rows(&self) -> [u8; 4] {
        range_bytes(self.y0, self.y1)
    }

    /// Number of pixels in the window
    pub fn pixel_count(&self) -> usize {
        (usize::from(self.x1 - self.x0) + 1) * (usize::from(self.y1 - self.y0) + 1)
    }
}

/// Encode an address range as two big-endian 16-bit values
const fn range_bytes(start: u16, end: u16) -> [u8; 4] {
    let [start_high, start_low] = start.to_be_bytes();
    let [end_high, end_low] = end.to_be_bytes();
    [start_high, start_low, end_high, end_low]
}

/// A buffer holding `CHUNK_PIXELS` copies of one color
pub fn solid_chunk(color: u16) -> [u8; 2 * CHUNK_PIXELS] {
    let mut buffer = [0x00; 2 * CHUNK_PIXELS];
    for pixel in buffer.chunks_exact_mut(2) {
        pixel.copy_from_slice(&color.to_be_bytes());
    }
    buffer
}
