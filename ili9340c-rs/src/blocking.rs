// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Blocking display

use log::debug;
use log::log_enabled;
use log::trace;
use log::warn;
use log::Level::Trace;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use embedded_hal::pwm::SetDutyCycle;

use crate::command;
use crate::orientation::dimensions;
use crate::window::solid_chunk;
use crate::window::Window;
use crate::window::CHUNK_PIXELS;
use crate::Config;
use crate::Error;
use crate::Line;
use crate::Transport;
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
pub struct Display<T: Transport, BL: SetDutyCycle, DELAY: DelayNs> {
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
    T: Transport,
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
    pub fn initialize(&mut self) -> Result<(), Error> {
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

        self.hardware_reset()?;
        self.software_reset()?;
        self.sleep_out()?;
        self.configure()?;

        if let Some(madctl) = self.config.madctl {
            self.set_rotation(madctl)?;
        }

        self.write_command(command::DISPLAY_ON)?;
        self.delay.delay_ms(100);

        self.set_brightness(self.config.initial_brightness)?;
        debug!("Initialize display / Done");

        Ok(())
    }

    /// Send power, gamma and pixel format configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    fn configure(&mut self) -> Result<(), Error> {
        debug!("Configure display");
        for &(command, parameters) in command::CONFIGURATION {
            self.write_command(command)?;
            self.write_data(parameters)?;
        }

        self.write_command(command::PIXEL_FORMAT_SET)?;
        self.write_data(&[command::PIXEL_FORMAT_RGB565])?;
        debug!("Configure display / Done");

        Ok(())
    }

    /// Turn the display and the backlight on
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub fn power_on(&mut self) -> Result<(), Error> {
        debug!("Power on display");
        self.write_command(command::DISPLAY_ON)?;
        self.backlight
            .set_duty_cycle_fully_on()
            .map_err(Error::from_pwm)
    }

    /// Turn the display and the backlight off
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub fn power_off(&mut self) -> Result<(), Error> {
        debug!("Power off display");
        self.write_command(command::DISPLAY_OFF)?;
        self.backlight
            .set_duty_cycle_fully_off()
            .map_err(Error::from_pwm)
    }

    /// Set the memory access control byte
    ///
    /// The logical dimensions follow the row/column exchange bit: landscape
    /// (320×240) when set, portrait (240×320) when clear.
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub fn set_rotation(&mut self, madctl: u8) -> Result<(), Error> {
        debug!("Set rotation to {madctl:#04x}");
        self.write_command(command::MEMORY_ACCESS_CONTROL)?;
        self.write_data(&[madctl])?;

        (self.width, self.height) = dimensions(madctl);
        Ok(())
    }

    /// Set the backlight brightness
    ///
    /// The duty cycle is linear in `level`, from 0 (off) to 255 (fully on).
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
    /// Steps through all 256 levels, waiting `duration_ms / 255` milliseconds
    /// between consecutive steps. The division truncates, so the fade takes
    /// `(duration_ms / 255) * 255` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if setting the duty cycle fails.
    pub fn fade_in(&mut self, duration_ms: u32) -> Result<(), Error> {
        debug!("Fade in over {duration_ms} ms");
        let step_ms = duration_ms / u32::from(u8::MAX);

        self.set_brightness(0)?;
        for level in 1..=u8::MAX {
            self.delay.delay_ms(step_ms);
            self.set_brightness(level)?;
        }
        debug!("Fade in / Done");

        Ok(())
    }

    /// Set the addressing window
    ///
    /// Coordinates are inclusive. This only programs the addresses; send
    /// [`Self::write_memory_start`] before streaming pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is reversed or reaches past the panel,
    /// before anything is sent, or if any commands to the display fails.
    pub fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Error> {
        let window = Window::new((x0, y0, x1, y1), self.dimensions())?;
        self.program_window(&window)
    }

    /// Start a memory write into the current addressing window
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub fn write_memory_start(&mut self) -> Result<(), Error> {
        self.write_command(command::MEMORY_WRITE)
    }

    /// Fill the whole screen with a color
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    pub fn fill_screen(&mut self, color: u16) -> Result<(), Error> {
        debug!("Fill screen with {color:#06x}");
        let window = Window::full(self.dimensions());
        self.fill(&window, color)?;
        debug!("Fill screen / Done");

        Ok(())
    }

    /// Fill a rectangle with a color
    ///
    /// # Errors
    ///
    /// Returns an error if the window is reversed or reaches past the panel,
    /// before anything is sent, or if any commands to the display fails.
    pub fn fill_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    ) -> Result<(), Error> {
        let window = Window::new((x0, y0, x1, y1), self.dimensions())?;
        self.fill(&window, color)
    }

    /// Draw a single pixel
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel lies outside the panel, before anything
    /// is sent, or if any commands to the display fails.
    pub fn draw_pixel(&mut self, x: u16, y: u16, color: u16) -> Result<(), Error> {
        let window = Window::pixel(x, y, self.dimensions())?;
        self.program_window(&window)?;
        self.write_memory_start()?;
        self.write_data(&color.to_be_bytes())
    }

    /// Stream colors into a rectangle, row by row
    ///
    /// Stops at the end of the window or when `colors` runs out, whichever
    /// comes first.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is reversed or reaches past the panel,
    /// before anything is sent, or if any commands to the display fails.
    pub fn write_pixels<I>(
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
        self.program_window(&window)?;
        self.write_memory_start()?;

        self.begin_data()?;
        let result = self.stream_pixels(&window, colors);
        self.end_data(result)
    }

    /// Send a command
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    pub fn write_command(&mut self, command: u8) -> Result<(), Error> {
        if log_enabled!(Trace) {
            trace!("Send command {command:#04x}");
        }
        self.transport.set_line(Line::DataCommand, COMMAND)?;
        self.transport.set_line(Line::ChipSelect, SELECTED)?;
        let result = self.transport.write_bytes(&[command]);
        self.end_data(result)
    }

    /// Send command parameters or pixel data
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), Error> {
        self.begin_data()?;
        let result = self.transport.write_bytes(data);
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
    fn program_window(&mut self, window: &Window) -> Result<(), Error> {
        self.write_command(command::COLUMN_ADDRESS_SET)?;
        self.write_data(&window.columns())?;
        self.write_command(command::ROW_ADDRESS_SET)?;
        self.write_data(&window.rows())
    }

    /// Fill a checked window with one color
    ///
    /// Chip select stays asserted for the whole frame.
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    fn fill(&mut self, window: &Window, color: u16) -> Result<(), Error> {
        self.program_window(window)?;
        self.write_memory_start()?;

        self.begin_data()?;
        let result = self.stream_solid(window, color);
        self.end_data(result)
    }

    /// Send one color for every pixel of a window, in chunks
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    fn stream_solid(&mut self, window: &Window, color: u16) -> Result<(), Error> {
        let chunk = solid_chunk(color);
        let pixels = window.pixel_count();

        for _ in 0..pixels / CHUNK_PIXELS {
            self.transport.write_bytes(&chunk)?;
        }
        let remainder = pixels % CHUNK_PIXELS;
        if remainder > 0 {
            self.transport.write_bytes(&chunk[..2 * remainder])?;
        }
        Ok(())
    }

    /// Send colors for at most every pixel of a window, in chunks
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    fn stream_pixels<I>(&mut self, window: &Window, colors: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut buffer = [0x00; 2 * CHUNK_PIXELS];
        let mut length = 0;
        for color in colors.into_iter().take(window.pixel_count()) {
            buffer[length..length + 2].copy_from_slice(&color.to_be_bytes());
            length += 2;
            if length == buffer.len() {
                self.transport.write_bytes(&buffer)?;
                length = 0;
            }
        }
        if length > 0 {
            self.transport.write_bytes(&buffer[..length])?;
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

    /// Release the display after a transfer
    ///
    /// Chip select is released even when the transfer failed.
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
    fn software_reset(&mut self) -> Result<(), Error> {
        debug!("Software reset");
        self.write_command(command::SOFTWARE_RESET)?;
        self.delay.delay_ms(150);
        debug!("Software reset / done");

        Ok(())
    }

    /// Wake the display from sleep
    ///
    /// # Errors
    ///
    /// Returns an error if any commands to the display fails
    fn sleep_out(&mut self) -> Result<(), Error> {
        debug!("Sleep out");
        self.write_command(command::SLEEP_OUT)?;
        self.delay.delay_ms(150);
        debug!("Sleep out / done");

        Ok(())
    }

    /// Reset the display
    ///
    /// # Errors
    ///
    /// Returns an error if setting any pin fails.
    fn hardware_reset(&mut self) -> Result<(), Error> {
        debug!("Hardware reset");
        trace!("Set RST low");
        self.transport.set_line(Line::Reset, PinState::Low)?;
        self.delay.delay_ms(100);

        trace!("Set RST high");
        self.transport.set_line(Line::Reset, PinState::High)?;
        self.delay.delay_ms(150);
        debug!("Hardware reset / done");

        Ok(())
    }
}

#[cfg(feature = "draw-target")]
mod draw_target {
    //! Drawing with `embedded-graphics`

    use embedded_graphics_core::draw_target::DrawTarget;
    use embedded_graphics_core::geometry::Dimensions;
    use embedded_graphics_core::geometry::OriginDimensions;
    use embedded_graphics_core::geometry::Size;
    use embedded_graphics_core::pixelcolor::IntoStorage;
    use embedded_graphics_core::pixelcolor::Rgb565;
    use embedded_graphics_core::primitives::Rectangle;
    use embedded_graphics_core::primitives::PointsIter;
    use embedded_graphics_core::Pixel;

    use embedded_hal::delay::DelayNs;
    use embedded_hal::pwm::SetDutyCycle;

    use super::Display;
    use crate::Error;
    use crate::Transport;

    /// Convert an in-bounds rectangle to inclusive corner coordinates
    fn corners(area: &Rectangle) -> Option<(u16, u16, u16, u16)> {
        let bottom_right = area.bottom_right()?;
        Some((
            u16::try_from(area.top_left.x).ok()?,
            u16::try_from(area.top_left.y).ok()?,
            u16::try_from(bottom_right.x).ok()?,
            u16::try_from(bottom_right.y).ok()?,
        ))
    }

    impl<T, BL, DELAY> OriginDimensions for Display<T, BL, DELAY>
    where
        T: Transport,
        BL: SetDutyCycle,
        DELAY: DelayNs,
    {
        fn size(&self) -> Size {
            Size::new(u32::from(self.width()), u32::from(self.height()))
        }
    }

    impl<T, BL, DELAY> DrawTarget for Display<T, BL, DELAY>
    where
        T: Transport,
        BL: SetDutyCycle,
        DELAY: DelayNs,
    {
        type Color = Rgb565;
        type Error = Error;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            let (width, height) = self.dimensions();
            for Pixel(point, color) in pixels {
                if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                    if x < width && y < height {
                        self.draw_pixel(x, y, color.into_storage())?;
                    }
                }
            }
            Ok(())
        }

        fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Self::Color>,
        {
            if area.intersection(&self.bounding_box()) == *area {
                if let Some((x0, y0, x1, y1)) = corners(area) {
                    let colors = colors.into_iter().map(IntoStorage::into_storage);
                    return self.write_pixels(x0, y0, x1, y1, colors);
                }
                return Ok(());
            }

            self.draw_iter(
                area.points()
                    .zip(colors)
                    .map(|(point, color)| Pixel(point, color)),
            )
        }

        fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
            let area = area.intersection(&self.bounding_box());
            match corners(&area) {
                Some((x0, y0, x1, y1)) => self.fill_window(x0, y0, x1, y1, color.into_storage()),
                None => Ok(()),
            }
        }
    }
}
