// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files License-MIT.txt and License-Apache-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Driver configuration

/// Default SPI clock in hertz
pub const DEFAULT_FREQUENCY: u32 = 10_000_000;

/// Highest SPI clock in hertz the controller reliably accepts for writes
pub const MAX_FREQUENCY: u32 = 20_000_000;

/// Driver configuration
///
/// The driver never changes the bus clock. The caller must configure the SPI
/// bus at `frequency` with its HAL before handing it to
/// `SpiTransport::new`; the driver only reads the
/// value to warn about clocks above [`MAX_FREQUENCY`]. Faster clocks fill the
/// screen quicker at the cost of noise margin.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// SPI clock in hertz the caller configured the bus with
    pub frequency: u32,

    /// Memory access control byte applied during initialization
    pub madctl: Option<u8>,

    /// Backlight brightness applied at the end of initialization
    pub initial_brightness: u8,
}

impl Config {
    /// Create the default configuration
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            madctl: None,
            initial_brightness: 0,
        }
    }

    /// Set the SPI clock in hertz
    #[must_use]
    pub const fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the memory access control byte applied during initialization
    #[must_use]
    pub const fn with_madctl(mut self, madctl: u8) -> Self {
        self.madctl = Some(madctl);
        self
    }

    /// Set the backlight brightness applied at the end of initialization
    #[must_use]
    pub const fn with_initial_brightness(mut self, brightness: u8) -> Self {
        self.initial_brightness = brightness;
        self
    }

    /// Check whether the SPI clock is above what the controller accepts
    #[must_use]
    pub const fn is_overclocked(&self) -> bool {
        self.frequency > MAX_FREQUENCY
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
