// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files License-MIT.txt and License-Apache-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Async display
//!
//! Every operation borrows the display mutably until its last transfer
//! completes, so a window programming and the pixel stream that follows it
//! cannot interleave with another operation on the same bus, even though the
//! future yields between transfers.

use log::debug;
use log::log_enabled;
use log::trace;
use log::warn;
use log::Level::Trace;

use embedded_hal_async::delay::DelayNs;

use embedded_hal::digital::PinState;
use embedded_hal::pwm::SetDutyCycle;

use crate::command;
use crate::orientation::dimensions;
use crate::window::solid_chunk;
use crate::window::Window;
use crate::window::CHUNK_PIXELS;
use crate::AsyncTransport;
use crate::Config;
use crate::Error;
use crate::Line;
use crate::HEIGHT;
use crate::WIDTH;

/// Level of an asserted chip select
const SELECTED: PinState = PinState::Low;

/// Level of a released chip select
const DESELECTED: PinState = PinState::High;

/// Level of data/command during the command phase
const COMMAND: PinState = PinState::Low;

/// Level of data/command during the data phase
const DATA: PinState = PinState::High;

/// An ILI9340C TFT screen
pub struct Display<T: AsyncTransport, BL: SetDutyCycle, DELAY: DelayNs> {
    /// Bus and control lines
    transport: T,

    /// Backlight PWM channel
    backlight: BL,

    ///Delay
    delay: DELAY,

    /// Configuration
    config: Config,

    /// Logical width for the current rotation
    width: u16,

    /// Logical height for the current rotation
    height: u16,
}

impl<T, BL, DELAY> Display<T, BL, DELAY>
where
    T: AsyncTransport,
    BL: SetDutyCycle,
    DELAY: DelayNs,
{
    /// Create a new display
    #[must_use]
    pub fn new(transport: T, backlight: BL, delay: DELAY, config: Config) -> Self {
        Self {
            transport,
            backlight,
            delay,
            config,
            width: WIDTH,
            height: HEIGHT,
        }
    }

    /// Logical width for the current rotation
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Logical height for the current rotation
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Logical width and height for the current rotation
    #[must_use]
    pub const fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Initialize display
    ///
    /// Runs the whole power-up sequence. It must run once per power cycle
    /// before anything else; running it again repeats the sequence from the
    /// hardware reset and ends in the same state.
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub async fn initialize(&mut self) -> Result<(), Error> {
        debug!("Initialize display");
        if self.config.is_overclocked() {
            warn!(
                "SPI clock {} Hz is above the supported {} Hz",
                self.config.frequency,
                crate::MAX_FREQUENCY
            );
        }

        trace!("Silence other device on the bus");
        self.transport.set_line(Line::SecondarySelect, DESELECTED)?;
        self.transport.set_line(Line::ChipSelect, DESELECTED)?;

        self.hardware_reset().await?;
        self.software_reset().await?;
        self.sleep_out().await?;
        self.configure().await?;

        if let Some(madctl) = self.config.madctl {
            self.set_rotation(madctl).await?;
        }

        self.write_command(command::DISPLAY_ON).await?;
        self.delay.delay_ms(100).await;

        self.set_brightness(self.config.initial_brightness)?;
        debug!("Initialize display / Done");

        Ok(())
    }

    /// Send power, gamma and pixel format configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    async fn configure(&mut self) -> Result<(), Error> {
        debug!("Configure display");
        for &(command, parameters) in command::CONFIGURATION {
            self.write_command(command).await?;
            self.write_data(parameters).await?;
        }

        self.write_command(command::PIXEL_FORMAT_SET).await?;
        self.write_data(&[command::PIXEL_FORMAT_RGB565]).await?;
        debug!("Configure display / Done");

        Ok(())
    }

    /// Turn the display and the backlight on
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub async fn power_on(&mut self) -> Result<(), Error> {
        debug!("Power on display");
        self.write_command(command::DISPLAY_ON).await?;
        self.backlight
            .set_duty_cycle_fully_on()
            .map_err(Error::from_pwm)
    }

    /// Turn the display and the backlight off
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub async fn power_off(&mut self) -> Result<(), Error> {
        debug!("Power off display");
        self.write_command(command::DISPLAY_OFF).await?;
        self.backlight
            .set_duty_cycle_fully_off()
            .map_err(Error::from_pwm)
    }

    /// Set the memory access control byte
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub async fn set_rotation(&mut self, madctl: u8) -> Result<(), Error> {
        debug!("Set rotation to {madctl:#04x}");
        self.write_command(command::MEMORY_ACCESS_CONTROL).await?;
        self.write_data(&[madctl]).await?;

        (self.width, self.height) = dimensions(madctl);
        Ok(())
    }

    /// Set the backlight brightness
    ///
    /// # Errors
    ///
    /// Returns an error if setting the duty cycle fails.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error> {
        trace!("Set brightness to {level}");
        self.backlight
            .set_duty_cycle_fraction(u16::from(level), u16::from(u8::MAX))
            .map_err(Error::from_pwm)
    }

    /// Fade the backlight in from off to fully on
    ///
    /// Waits `duration_ms / 255` milliseconds, truncated, between each of the
    /// 256 levels.
    ///
    /// # Errors
    ///
    /// Returns an error if setting the duty cycle fails.
    pub async fn fade_in(&mut self, duration_ms: u32) -> Result<(), Error> {
        debug!("Fade in over {duration_ms} ms");
        let step_ms = duration_ms / u32::from(u8::MAX);

        self.set_brightness(0)?;
        for level in 1..=u8::MAX {
            self.delay.delay_ms(step_ms).await;
            self.set_brightness(level)?;
        }
        debug!("Fade in / Done");

        Ok(())
    }

    /// Set the addressing window
    ///
    /// Only programs the addresses, see [`Self::write_memory_start`].
    ///
    /// # Errors
    ///
    /// Returns an error if the window is reversed or reaches past the panel,
    /// before anything is sent, or if any commands to the display fails.
    pub async fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Error> {
        let window = Window::new((x0, y0, x1, y1), self.dimensions())?;
        self.program_window(&window).await
    }

    /// Start a memory write into the current addressing window
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub async fn write_memory_start(&mut self) -> Result<(), Error> {
        self.write_command(command::MEMORY_WRITE).await
    }

    /// Fill the whole screen with a color
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub async fn fill_screen(&mut self, color: u16) -> Result<(), Error> {
        debug!("Fill screen with {color:#06x}");
        let window = Window::full(self.dimensions());
        self.fill(&window, color).await?;
        debug!("Fill screen / Done");

        Ok(())
    }

    /// Fill a rectangle with a color
    ///
    /// # Errors
    ///
    /// Returns an error if the window is reversed or reaches past the panel,
    /// before anything is sent, or if any commands to the display fails.
    pub async fn fill_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    ) -> Result<(), Error> {
        let window = Window::new((x0, y0, x1, y1), self.dimensions())?;
        self.fill(&window, color).await
    }

    /// Draw a single pixel
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel lies outside the panel, before anything
    /// is sent, or if any commands to the display fails.
    pub async fn draw_pixel(&mut self, x: u16, y: u16, color: u16) -> Result<(), Error> {
        let window = Window::pixel(x, y, self.dimensions())?;
        self.program_window(&window).await?;
        self.write_memory_start().await?;
        self.write_data(&color.to_be_bytes()).await
    }

    /// Stream colors into a rectangle, row by row
    ///
    /// # Errors
    ///
    /// Returns an error if the window is reversed or reaches past the panel,
    /// before anything is sent, or if any commands to the display fails.
    pub async fn write_pixels<I>(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        colors: I,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = u16>,
    {
        let window = Window::new((x0, y0, x1, y1), self.dimensions())?;
        self.program_window(&window).await?;
        self.write_memory_start().await?;

        self.begin_data()?;
        let result = self.stream_pixels(&window, colors).await;
        self.end_data(result)
    }

    /// Send a command
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    pub async fn write_command(&mut self, command: u8) -> Result<(), Error> {
        if log_enabled!(Trace) {
            trace!("Send command {command:#04x}");
        }
        self.transport.set_line(Line::DataCommand, COMMAND)?;
        self.transport.set_line(Line::ChipSelect, SELECTED)?;
        let result = self.transport.write_bytes(&[command]).await;
        self.end_data(result)
    }

    /// Send command parameters or pixel data
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    pub async fn write_data(&mut self, data: &[u8]) -> Result<(), Error> {
        self.begin_data()?;
        let result = self.transport.write_bytes(data).await;
        self.end_data(result)
    }

    /// Release display and return inner hardware
    pub fn release(self) -> (T, BL, DELAY) {
        debug!("Release display");
        (self.transport, self.backlight, self.delay)
    }

    /// Send a checked window to the controller
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    async fn program_window(&mut self, window: &Window) -> Result<(), Error> {
        self.write_command(command::COLUMN_ADDRESS_SET).await?;
        self.write_data(&window.columns()).await?;
        self.write_command(command::ROW_ADDRESS_SET).await?;
        self.write_data(&window.rows()).await
    }

    /// Fill a checked window with one color, holding chip select throughout
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    async fn fill(&mut self, window: &Window, color: u16) -> Result<(), Error> {
        self.program_window(window).await?;
        self.write_memory_start().await?;

        self.begin_data()?;
        let result = self.stream_solid(window, color).await;
        self.end_data(result)
    }

    /// Send one color for every pixel of a window, in chunks
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    async fn stream_solid(&mut self, window: &Window, color: u16) -> Result<(), Error> {
        let chunk = solid_chunk(color);
        let pixels = window.pixel_count();

        for _ in 0..pixels / CHUNK_PIXELS {
            self.transport.write_bytes(&chunk).await?;
        }
        let remainder = pixels % CHUNK_PIXELS;
        if remainder > 0 {
            self.transport.write_bytes(&chunk[..2 * remainder]).await?;
        }
        Ok(())
    }

    /// Send colors for at most every pixel of a window, in chunks
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    async fn stream_pixels<I>(&mut self, window: &Window, colors: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut buffer = [0x00; 2 * CHUNK_PIXELS];
        let mut length = 0;
        for color in colors.into_iter().take(window.pixel_count()) {
            buffer[length..length + 2].copy_from_slice(&color.to_be_bytes());
            length += 2;
            if length == buffer.len() {
                self.transport.write_bytes(&buffer).await?;
                length = 0;
            }
        }
        if length > 0 {
            self.transport.write_bytes(&buffer[..length]).await?;
        }
        Ok(())
    }

    /// Select the display for a data phase
    ///
    /// # Errors
    ///
    /// Returns an error if setting any pin fails.
    fn begin_data(&mut self) -> Result<(), Error> {
        self.transport.set_line(Line::DataCommand, DATA)?;
        self.transport.set_line(Line::ChipSelect, SELECTED)
    }

    /// Release the display after a transfer, even a failed one
    ///
    /// # Errors
    ///
    /// Returns the transfer error if there is one, otherwise an error if
    /// setting any pin fails.
    fn end_data(&mut self, transfer: Result<(), Error>) -> Result<(), Error> {
        let release = self.transport.set_line(Line::ChipSelect, DESELECTED);
        transfer.and(release)
    }

    /// Send a reset command to the display
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    async fn software_reset(&mut self) -> Result<(), Error> {
        debug!("Software reset");
        self.write_command(command::SOFTWARE_RESET).await?;
        self.delay.delay_ms(150).await;
        debug!("Software reset / done");

        Ok(())
    }

    /// Wake the display from sleep
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    async fn sleep_out(&mut self) -> Result<(), Error> {
        debug!("Sleep out");
        self.write_command(command::SLEEP_OUT).await?;
        self.delay.delay_ms(150).await;
        debug!("Sleep out / done");

        Ok(())
    }

    /// Reset the display
    ///
    /// # Errors
    ///
    /// Returns an error if setting any pin fails.
    async fn hardware_reset(&mut self) -> Result<(), Error> {
        debug!("Hardware reset");
        trace!("Set RST low");
        self.transport.set_line(Line::Reset, PinState::Low)?;
        self.delay.delay_ms(100).await;

        trace!("Set RST high");
        self.transport.set_line(Line::Reset, PinState::High)?;
        self.delay.delay_ms(150).await;
        debug!("Hardware reset / done");

        Ok(())
    }
}
