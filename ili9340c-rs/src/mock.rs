// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files License-MIT.txt and License-Apache-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Recording doubles for the bus, the pins, the backlight and the delay
//!
//! All doubles created from the same [`Log`] append to one event list, so
//! tests can check the interleaving of line changes, transfers, duty cycles
//! and delays.

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::digital::ErrorType as DigitalErrorType;
use embedded_hal::digital::OutputPin;
use embedded_hal::digital::PinState;
use embedded_hal::pwm::ErrorType as PwmErrorType;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::ErrorKind as SpiErrorKind;
use embedded_hal::spi::ErrorType as SpiErrorType;

use crate::Error;
use crate::Line;

/// Something that happened on the hardware
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// A control line was driven
    Line(Line, PinState),

    /// Bytes were written to the bus
    Write(Vec<u8>),

    /// The bus was flushed
    Flush,

    /// The backlight duty cycle was set
    Duty(u16),

    /// A delay in milliseconds
    DelayMs(u32),

    /// A delay in nanoseconds
    DelayNs(u32),
}

/// A shared event list
#[derive(Clone, Debug, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Copy of all events so far
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Forget all events so far
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Commands sent so far, in order
    ///
    /// A command is a single-byte write while data/command is low.
    pub fn commands(&self) -> Vec<u8> {
        let mut commands = Vec::new();
        let mut is_command = false;
        for event in self.0.borrow().iter() {
            match *event {
                Event::Line(Line::DataCommand, state) => is_command = state == PinState::Low,
                Event::Write(ref bytes) if is_command => commands.extend_from_slice(bytes),
                _ => {}
            }
        }
        commands
    }

    /// Duty cycles set so far, in order
    pub fn duties(&self) -> Vec<u16> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match *event {
                Event::Duty(duty) => Some(duty),
                _ => None,
            })
            .collect()
    }
}

/// A transport that records line changes and writes
#[derive(Debug)]
pub struct MockTransport {
    /// Event log
    log: Log,

    /// Writes left before every further write fails with an SPI error
    remaining: Option<usize>,
}

impl MockTransport {
    /// Create a transport recording into a log
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            remaining: None,
        }
    }

    /// Create a transport whose writes always fail
    pub fn failing(log: &Log) -> Self {
        Self::failing_after(log, 0)
    }

    /// Create a transport whose writes fail after the first `writes`
    pub fn failing_after(log: &Log, writes: usize) -> Self {
        Self {
            log: log.clone(),
            remaining: Some(writes),
        }
    }

    /// Record a line change
    fn record_line(&self, line: Line, state: PinState) {
        self.log.push(Event::Line(line, state));
    }

    /// Record a write, or fail it
    fn record_write(&mut self, data: &[u8]) -> Result<(), Error> {
        match self.remaining {
            Some(0) => return Err(Error::Spi(SpiErrorKind::Other)),
            Some(ref mut remaining) => *remaining -= 1,
            None => {}
        }
        self.log.push(Event::Write(data.to_vec()));
        Ok(())
    }
}

#[cfg(feature = "blocking")]
impl crate::Transport for MockTransport {
    fn set_line(&mut self, line: Line, state: PinState) -> Result<(), Error> {
        self.record_line(line, state);
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        self.record_write(data)
    }
}

#[cfg(feature = "async")]
impl crate::AsyncTransport for MockTransport {
    fn set_line(&mut self, line: Line, state: PinState) -> Result<(), Error> {
        self.record_line(line, state);
        Ok(())
    }

    async fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        self.record_write(data)
    }
}

/// A PWM channel with a maximum duty cycle of 255
#[derive(Debug)]
pub struct MockBacklight {
    /// Event log
    log: Log,
}

impl MockBacklight {
    /// Create a channel recording into a log
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl PwmErrorType for MockBacklight {
    type Error = Infallible;
}

impl SetDutyCycle for MockBacklight {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.log.push(Event::Duty(duty));
        Ok(())
    }
}

/// A delay that returns immediately
#[derive(Debug)]
pub struct MockDelay {
    /// Event log
    log: Log,
}

impl MockDelay {
    /// Create a delay recording into a log
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayNs(us.saturating_mul(1_000)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayNs(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayNs(us.saturating_mul(1_000)));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}

/// An output pin standing for one control line
#[derive(Debug)]
pub struct MockPin {
    /// Event log
    log: Log,

    /// Line this pin is wired to
    line: Line,
}

impl MockPin {
    /// Create a pin recording into a log
    pub fn new(log: &Log, line: Line) -> Self {
        Self {
            log: log.clone(),
            line,
        }
    }

    /// Line this pin is wired to
    pub fn line(&self) -> Line {
        self.line
    }
}

impl DigitalErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Line(self.line, PinState::Low));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Line(self.line, PinState::High));
        Ok(())
    }
}

/// A write-only SPI bus
#[derive(Debug)]
pub struct MockSpi {
    /// Event log
    log: Log,
}

impl MockSpi {
    /// Create a bus recording into a log
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl SpiErrorType for MockSpi {
    type Error = Infallible;
}

impl embedded_hal::spi::SpiBus for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0x00);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.log.push(Event::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0x00);
        self.log.push(Event::Write(write.to_vec()));
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.log.push(Event::Write(words.to_vec()));
        words.fill(0x00);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Flush);
        Ok(())
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::spi::SpiBus for MockSpi {
    async fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::read(self, words)
    }

    async fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::write(self, words)
    }

    async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::transfer(self, read, write)
    }

    async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::transfer_in_place(self, words)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::flush(self)
    }
}
