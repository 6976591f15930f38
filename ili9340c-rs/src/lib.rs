// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Interface to ILI9340C/ILI9341 SPI TFT displays
//!
//! The driver owns one SPI bus and the control lines of a 240×320 panel: chip
//! select, data/command select, reset, a PWM backlight and a secondary chip
//! select that keeps another device on the same bus (usually an SD card slot)
//! silent.
//!
//! Bus access goes through the [`Transport`] trait (or [`AsyncTransport`]),
//! which [`SpiTransport`] implements on top of an `embedded-hal` or
//! `embedded-hal-async` SPI bus.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "async")]
mod r#async;
#[cfg(feature = "async")]
pub use self::r#async::Display as AsyncDisplay;

#[cfg(feature = "blocking")]
mod blocking;
#[cfg(feature = "blocking")]
pub use self::blocking::Display;

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod command;

mod color;
pub use self::color::rgb565;

mod config;
pub use self::config::Config;
pub use self::config::DEFAULT_FREQUENCY;
pub use self::config::MAX_FREQUENCY;

mod orientation;
pub use self::orientation::madctl;
pub use self::orientation::Orientation;
pub use self::orientation::HEIGHT;
pub use self::orientation::WIDTH;

#[cfg(any(feature = "async", feature = "blocking"))]
mod transport;
#[cfg(feature = "async")]
pub use self::transport::AsyncTransport;
#[cfg(any(feature = "async", feature = "blocking"))]
pub use self::transport::Line;
#[cfg(any(feature = "async", feature = "blocking"))]
pub use self::transport::SpiTransport;
#[cfg(feature = "blocking")]
pub use self::transport::Transport;

#[cfg(any(feature = "async", feature = "blocking"))]
mod window;

#[cfg(any(feature = "async", feature = "blocking"))]
mod error;
#[cfg(any(feature = "async", feature = "blocking"))]
pub use self::error::Error;

#[cfg(all(test, any(feature = "async", feature = "blocking")))]
mod mock;
