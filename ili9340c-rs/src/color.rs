// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files License-MIT.txt and License-Apache-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! RGB565 colors

/// Pack an 8-bit-per-channel color into RGB565
///
/// Each channel is truncated to its width: 5 bits of red, 6 bits of green and
/// 5 bits of blue, packed as `RRRRRGGGGGGBBBBB`.
#[must_use]
pub const fn rgb565(red: u8, green: u8, blue: u8) -> u16 {
    ((red as u16 & 0xF8) << 8) | ((green as u16 & 0xFC) << 3) | (blue as u16 >> 3)
}
