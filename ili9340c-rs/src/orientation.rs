// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files License-MIT.txt and License-Apache-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Panel orientation and memory access control

/// Panel width in portrait orientation
pub const WIDTH: u16 = 240;

/// Panel height in portrait orientation
pub const HEIGHT: u16 = 320;

/// Bits of the memory access control (MADCTL) byte
pub mod madctl {
    /// Row address order
    pub const MY: u8 = 0x80;

    /// Column address order
    pub const MX: u8 = 0x40;

    /// Row/column exchange
    pub const MV: u8 = 0x20;

    /// Vertical refresh order
    pub const ML: u8 = 0x10;

    /// BGR color filter panel
    pub const BGR: u8 = 0x08;

    /// Horizontal refresh order
    pub const MH: u8 = 0x04;
}

/// Logical dimensions for a memory access control byte
///
/// Only the row/column exchange bit matters: set gives landscape, clear gives
/// portrait.
#[must_use]
pub const fn dimensions(mode: u8) -> (u16, u16) {
    if mode & madctl::MV == 0 {
        (WIDTH, HEIGHT)
    } else {
        (HEIGHT, WIDTH)
    }
}

/// A screen orientation
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Orientation {
    /// Portrait, connector at the bottom
    Portrait,

    /// Landscape, rotated 90 degrees clockwise
    Landscape,

    /// Portrait, rotated 180 degrees
    PortraitFlipped,

    /// Landscape, rotated 270 degrees clockwise
    LandscapeFlipped,
}

impl Orientation {
    /// Memory access control byte for this orientation
    #[must_use]
    pub const fn madctl(self) -> u8 {
        match self {
            Self::Portrait => madctl::MX | madctl::BGR,
            Self::Landscape => madctl::MV | madctl::BGR,
            Self::PortraitFlipped => madctl::MY | madctl::BGR,
            Self::LandscapeFlipped => madctl::MX | madctl::MY | madctl::MV | madctl::BGR,
        }
    }

    /// Logical width and height for this orientation
    #[must_use]
    pub const fn dimensions(self) -> (u16, u16) {
        dimensions(self.madctl())
    }
}

impl From<Orientation> for u8 {
    fn from(orientation: Orientation) -> Self {
        orientation.madctl()
    }
}
