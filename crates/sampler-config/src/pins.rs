//! GPIO pin numbers and the two Raspberry Pi numbering modes.

use std::fmt;

/// A GPIO pin number, interpreted under a [`NumberingMode`].
///
/// Validity depends on the mode, so the check lives in
/// [`NumberingMode::is_valid_pin`] rather than in a constructor here.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct GpioPin(pub u8);

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical header positions that carry a GPIO line in BOARD mode.
const BOARD_PINS: [u8; 28] = [
    3, 5, 7, 8, 10, 11, 12, 13, 15, 16, 18, 19, 21, 22, 23, 24, 26, 27, 28, 29,
    31, 32, 33, 35, 36, 37, 38, 40,
];

/// How pin numbers in the configuration file are interpreted.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NumberingMode {
    /// Broadcom channel numbers, 0..=27.
    Bcm,
    /// Physical positions on the 40-pin header.
    Board,
}

impl NumberingMode {
    /// Parse the mode name as written in the device configuration file.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BCM"   => Some(NumberingMode::Bcm),
            "BOARD" => Some(NumberingMode::Board),
            _       => None,
        }
    }

    /// Whether `pin` names a real GPIO line under this mode.
    pub fn is_valid_pin(self, pin: GpioPin) -> bool {
        match self {
            NumberingMode::Bcm   => pin.0 <= 27,
            NumberingMode::Board => BOARD_PINS.contains(&pin.0),
        }
    }
}

impl fmt::Display for NumberingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberingMode::Bcm   => write!(f, "BCM"),
            NumberingMode::Board => write!(f, "BOARD"),
        }
    }
}
