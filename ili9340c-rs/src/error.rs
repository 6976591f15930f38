// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files License-MIT.txt and License-Apache-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Data structures and functions for error handling

use embedded_hal::digital::Error as DigitalError;
use embedded_hal::digital::ErrorKind as DigitalErrorKind;
use embedded_hal::pwm::Error as PwmError;
use embedded_hal::pwm::ErrorKind as PwmErrorKind;
use embedded_hal::spi::Error as SpiError;
use embedded_hal::spi::ErrorKind as SpiErrorKind;

/// An error
///
/// The first three variants are transport failures. The controller never
/// reports anything back, and a half-sent command cannot be resumed, so they
/// are never retried.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An error in the underlying SPI bus
    Spi(SpiErrorKind),

    /// An error in the underlying digital system
    Digital(DigitalErrorKind),

    /// An error in the backlight PWM channel
    Pwm(PwmErrorKind),

    /// An addressing window that is empty, reversed or beyond the panel
    InvalidWindow,

    /// A pixel coordinate beyond the panel
    OutOfBounds,
}

impl<E> From<E> for Error
where
    E: SpiError,
{
    fn from(error: E) -> Self {
        Self::Spi(error.kind())
    }
}

impl Error {
    /// Convert a digital error to an error
    #[allow(clippy::needless_pass_by_value)]
    pub fn from_digital<E>(error: E) -> Self
    where
        E: DigitalError,
    {
        Self::Digital(error.kind())
    }

    /// Convert a PWM error to an error
    #[allow(clippy::needless_pass_by_value)]
    pub fn from_pwm<E>(error: E) -> Self
    where
        E: PwmError,
    {
        Self::Pwm(error.kind())
    }

    /// Check whether this error was raised by the bus, a pin or the PWM channel
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(*self, Self::Spi(_) | Self::Digital(_) | Self::Pwm(_))
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Self::Spi(kind) => write!(f, "SPI error: {kind}"),
            Self::Digital(kind) => write!(f, "digital error: {kind}"),
            Self::Pwm(kind) => write!(f, "PWM error: {kind}"),
            Self::InvalidWindow => write!(f, "invalid addressing window"),
            Self::OutOfBounds => write!(f, "coordinate out of bounds"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spi_errors_convert_through_their_kind() {
        let error: Error = SpiErrorKind::Overrun.into();
        assert_eq!(error, Error::Spi(SpiErrorKind::Overrun));
        assert!(error.is_transport());
    }

    #[test]
    fn argument_errors_are_not_transport_errors() {
        assert!(!Error::InvalidWindow.is_transport());
        assert!(!Error::OutOfBounds.is_transport());
        assert!(Error::from_digital(DigitalErrorKind::Other).is_transport());
        assert!(Error::from_pwm(PwmErrorKind::Other).is_transport());
    }
}
