// Copyright Claudio Mattera 2024-2025.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files License-MIT.txt and License-Apache-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Commands

/// Command for software reset
pub const SOFTWARE_RESET: u8 = 0x01;

/// Command for leaving sleep mode
pub const SLEEP_OUT: u8 = 0x11;

/// Command for selecting the gamma curve
pub const GAMMA_SET: u8 = 0x26;

/// Command for turning the display off
pub const DISPLAY_OFF: u8 = 0x28;

/// Command for turning the display on
pub const DISPLAY_ON: u8 = 0x29;

/// Command for setting the column address range
pub const COLUMN_ADDRESS_SET: u8 = 0x2A;

/// Command for setting the row (page) address range
pub const ROW_ADDRESS_SET: u8 = 0x2B;

/// Command for writing pixels to the addressing window
pub const MEMORY_WRITE: u8 = 0x2C;

/// Command for memory access control (MADCTL)
pub const MEMORY_ACCESS_CONTROL: u8 = 0x36;

/// Command for setting the pixel format
pub const PIXEL_FORMAT_SET: u8 = 0x3A;

/// Command for frame rate control in normal mode
pub const FRAME_RATE_CONTROL: u8 = 0xB1;

/// Command for display function control
pub const DISPLAY_FUNCTION_CONTROL: u8 = 0xB6;

/// Command for power control 1
pub const POWER_CONTROL_1: u8 = 0xC0;

/// Command for power control 2
pub const POWER_CONTROL_2: u8 = 0xC1;

/// Command for VCOM control 1
pub const VCOM_CONTROL_1: u8 = 0xC5;

/// Command for VCOM control 2
pub const VCOM_CONTROL_2: u8 = 0xC7;

/// Command for power control A
pub const POWER_CONTROL_A: u8 = 0xCB;

/// Command for power control B
pub const POWER_CONTROL_B: u8 = 0xCF;

/// Command for positive gamma correction
pub const POSITIVE_GAMMA_CORRECTION: u8 = 0xE0;

/// Command for negative gamma correction
pub const NEGATIVE_GAMMA_CORRECTION: u8 = 0xE1;

/// Command for driver timing control A
pub const DRIVER_TIMING_CONTROL_A: u8 = 0xE8;

/// Command for driver timing control B
pub const DRIVER_TIMING_CONTROL_B: u8 = 0xEA;

/// Command for power on sequence control
pub const POWER_ON_SEQUENCE_CONTROL: u8 = 0xED;

/// Command for enabling the 3-gamma function
pub const ENABLE_3_GAMMA: u8 = 0xF2;

/// Command for pump ratio control
pub const PUMP_RATIO_CONTROL: u8 = 0xF7;

/// Pixel format parameter for 16 bits per pixel on both interfaces
pub const PIXEL_FORMAT_RGB565: u8 = 0x55;

/// Power, VCOM, frame rate, display function and gamma configuration
///
/// Sent in this order after leaving sleep mode. The extended power controls
/// must precede the other registers, which depend on the supply rails they
/// set up.
pub const CONFIGURATION: &[(u8, &[u8])] = &[
    (POWER_CONTROL_A, &[0x39, 0x2C, 0x00, 0x34, 0x02]),
    (POWER_CONTROL_B, &[0x00, 0xC1, 0x30]),
    (DRIVER_TIMING_CONTROL_A, &[0x85, 0x00, 0x78]),
    (DRIVER_TIMING_CONTROL_B, &[0x00, 0x00]),
    (POWER_ON_SEQUENCE_CONTROL, &[0x64, 0x03, 0x12, 0x81]),
    (PUMP_RATIO_CONTROL, &[0x20]),
    (POWER_CONTROL_1, &[0x23]),
    (POWER_CONTROL_2, &[0x10]),
    (VCOM_CONTROL_1, &[0x3E, 0x28]),
    (VCOM_CONTROL_2, &[0x86]),
    // 79 Hz
    (FRAME_RATE_CONTROL, &[0x00, 0x18]),
    (DISPLAY_FUNCTION_CONTROL, &[0x08, 0x82, 0x27]),
    (ENABLE_3_GAMMA, &[0x00]),
    (GAMMA_SET, &[0x01]),
    (
        POSITIVE_GAMMA_CORRECTION,
        &[
            0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1, 0x37, 0x07, 0x10, 0x03, 0x0E, 0x09,
            0x00,
        ],
    ),
    (
        NEGATIVE_GAMMA_CORRECTION,
        &[
            0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36,
            0x0F,
        ],
    ),
];
