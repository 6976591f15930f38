// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files License-MIT.txt and License-Apache-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Access to the SPI bus and the control lines

use log::log_enabled;
use log::trace;
use log::Level::Trace;

use embedded_hal::digital::OutputPin;
use embedded_hal::digital::PinState;

#[cfg(feature = "blocking")]
use embedded_hal::spi::SpiBus;

#[cfg(feature = "async")]
use embedded_hal_async::spi::SpiBus as AsyncSpiBus;

use crate::Error;

/// Largest single transfer accepted by Linux spidev
///
/// See <https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096>
const MAX_LINUX_TRANSFER_SIZE: usize = 4096;

/// A digital control line
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// Display chip select, active low
    ChipSelect,

    /// Data/command select, low for commands and high for data
    DataCommand,

    /// Display reset, active low
    Reset,

    /// Chip select of the other device on the bus, active low
    SecondarySelect,
}

/// Blocking access to the bus and the control lines
#[cfg(feature = "blocking")]
pub trait Transport {
    /// Drive a control line
    ///
    /// # Errors
    ///
    /// Returns an error if setting the pin fails.
    fn set_line(&mut self, line: Line, state: PinState) -> Result<(), Error>;

    /// Write bytes to the bus
    ///
    /// Returns only after the last byte has left the bus.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error>;
}

/// Async access to the bus and the control lines
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncTransport {
    /// Drive a control line
    ///
    /// # Errors
    ///
    /// Returns an error if setting the pin fails.
    fn set_line(&mut self, line: Line, state: PinState) -> Result<(), Error>;

    /// Write bytes to the bus
    ///
    /// Completes only after the last byte has left the bus.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to SPI bus fails.
    async fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error>;
}

/// A transport over an `embedded-hal` SPI bus and four output pins
///
/// Chip select is a plain pin rather than part of an `SpiDevice`, because the
/// driver keeps it asserted across several bus writes while streaming pixels.
#[derive(Debug)]
pub struct SpiTransport<SPI, CS, DC, RST, SDCS> {
    /// SPI bus
    spi: SPI,

    /// CS pin
    cs: CS,

    /// DC pin
    dc: DC,

    /// RST pin
    rst: RST,

    /// CS pin of the other device on the bus
    sdcs: SDCS,
}

impl<SPI, CS, DC, RST, SDCS> SpiTransport<SPI, CS, DC, RST, SDCS>
where
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    SDCS: OutputPin,
{
    /// Create a new transport
    #[must_use]
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST, sdcs: SDCS) -> Self {
        Self {
            spi,
            cs,
            dc,
            rst,
            sdcs,
        }
    }

    /// Release transport and return inner hardware
    pub fn release(self) -> (SPI, CS, DC, RST, SDCS) {
        (self.spi, self.cs, self.dc, self.rst, self.sdcs)
    }

    /// Drive one of the pins
    ///
    /// # Errors
    ///
    /// Returns an error if setting the pin fails.
    fn drive(&mut self, line: Line, state: PinState) -> Result<(), Error> {
        trace!("Set {line:?} {state:?}");
        match line {
            Line::ChipSelect => self.cs.set_state(state).map_err(Error::from_digital),
            Line::DataCommand => self.dc.set_state(state).map_err(Error::from_digital),
            Line::Reset => self.rst.set_state(state).map_err(Error::from_digital),
            Line::SecondarySelect => self.sdcs.set_state(state).map_err(Error::from_digital),
        }
    }
}

#[cfg(feature = "blocking")]
impl<SPI, CS, DC, RST, SDCS> Transport for SpiTransport<SPI, CS, DC, RST, SDCS>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    SDCS: OutputPin,
{
    fn set_line(&mut self, line: Line, state: PinState) -> Result<(), Error> {
        self.drive(line, state)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        if log_enabled!(Trace) {
            trace!("Write {} bytes to SPI", data.len());
        }

        if cfg!(target_os = "linux") {
            for data_chunk in data.chunks(MAX_LINUX_TRANSFER_SIZE) {
                SpiBus::write(&mut self.spi, data_chunk)?;
            }
        } else {
            SpiBus::write(&mut self.spi, data)?;
        }
        SpiBus::flush(&mut self.spi)?;

        Ok(())
    }
}

#[cfg(feature = "async")]
impl<SPI, CS, DC, RST, SDCS> AsyncTransport for SpiTransport<SPI, CS, DC, RST, SDCS>
where
    SPI: AsyncSpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    SDCS: OutputPin,
{
    fn set_line(&mut self, line: Line, state: PinState) -> Result<(), Error> {
        self.drive(line, state)
    }

    async fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        if log_enabled!(Trace) {
            trace!("Write {} bytes to SPI", data.len());
        }

        if cfg!(target_os = "linux") {
            trace!("Write bytes in chunks of {MAX_LINUX_TRANSFER_SIZE} bytes");
            for data_chunk in data.chunks(MAX_LINUX_TRANSFER_SIZE) {
                AsyncSpiBus::write(&mut self.spi, data_chunk).await?;
            }
        } else {
            AsyncSpiBus::write(&mut self.spi, data).await?;
        }
        AsyncSpiBus::flush(&mut self.spi).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "async")]
    use embassy_futures::block_on;

    use super::*;
    use crate::mock::Event;
    use crate::mock::Log;
    use crate::mock::MockPin;
    use crate::mock::MockSpi;

    /// Build a transport whose pins and bus record into one log
    fn transport(log: &Log) -> SpiTransport<MockSpi, MockPin, MockPin, MockPin, MockPin> {
        SpiTransport::new(
            MockSpi::new(log),
            MockPin::new(log, Line::ChipSelect),
            MockPin::new(log, Line::DataCommand),
            MockPin::new(log, Line::Reset),
            MockPin::new(log, Line::SecondarySelect),
        )
    }

    #[cfg(feature = "blocking")]
    #[test]
    fn lines_map_to_their_pins() -> Result<(), Error> {
        let log = Log::new();
        let mut transport = transport(&log);

        Transport::set_line(&mut transport, Line::SecondarySelect, PinState::High)?;
        Transport::set_line(&mut transport, Line::ChipSelect, PinState::Low)?;
        Transport::set_line(&mut transport, Line::DataCommand, PinState::High)?;
        Transport::set_line(&mut transport, Line::Reset, PinState::Low)?;

        assert_eq!(
            log.events(),
            [
                Event::Line(Line::SecondarySelect, PinState::High),
                Event::Line(Line::ChipSelect, PinState::Low),
                Event::Line(Line::DataCommand, PinState::High),
                Event::Line(Line::Reset, PinState::Low),
            ]
        );
        Ok(())
    }

    #[cfg(feature = "blocking")]
    #[test]
    fn writes_are_flushed() -> Result<(), Error> {
        let log = Log::new();
        let mut transport = transport(&log);

        Transport::write_bytes(&mut transport, &[0x2A, 0x00])?;

        assert_eq!(
            log.events(),
            [Event::Write(vec![0x2A, 0x00]), Event::Flush]
        );
        Ok(())
    }

    #[cfg(all(feature = "blocking", target_os = "linux"))]
    #[test]
    fn large_writes_are_chunked_on_linux() -> Result<(), Error> {
        let log = Log::new();
        let mut transport = transport(&log);

        let data = [0x5A; 5000];
        Transport::write_bytes(&mut transport, &data)?;

        assert_eq!(
            log.events(),
            [
                Event::Write(vec![0x5A; 4096]),
                Event::Write(vec![0x5A; 904]),
                Event::Flush,
            ]
        );
        Ok(())
    }

    #[cfg(feature = "async")]
    #[test]
    fn async_writes_are_flushed() -> Result<(), Error> {
        let log = Log::new();
        let mut transport = transport(&log);

        block_on(AsyncTransport::write_bytes(&mut transport, &[0x01]))?;
        AsyncTransport::set_line(&mut transport, Line::ChipSelect, PinState::High)?;

        assert_eq!(
            log.events(),
            [
                Event::Write(vec![0x01]),
                Event::Flush,
                Event::Line(Line::ChipSelect, PinState::High),
            ]
        );
        Ok(())
    }

    #[cfg(feature = "blocking")]
    #[test]
    fn release_returns_the_hardware() {
        let log = Log::new();
        let (_spi, cs, _dc, _rst, sdcs) = transport(&log).release();
        assert_eq!(cs.line(), Line::ChipSelect);
        assert_eq!(sdcs.line(), Line::SecondarySelect);
    }
}
