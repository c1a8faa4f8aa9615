//! The pin-driver seam between actuation logic and platform GPIO.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use sampler_config::GpioPin;

use crate::error::{HardwareError, HardwareResult};

/// The single primitive the rest of the crate needs from a platform: drive
/// one output pin high or low.
///
/// Implementations are fail-fast — any platform error surfaces to the
/// caller, never silently swallowed — and synchronous; a write is assumed to
/// complete in register-write time.
pub trait PinDriver {
    fn write(&mut self, pin: GpioPin, high: bool) -> HardwareResult<()>;
}

/// In-memory driver for tests and hardware-less bench runs.
///
/// Records the last level written to each pin; individual pins can be set
/// to fail, for exercising fault paths.
#[derive(Clone, Debug, Default)]
pub struct BenchDriver {
    levels:    BTreeMap<GpioPin, bool>,
    fail_pins: BTreeSet<GpioPin>,
}

impl BenchDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `pin` fail from now on.
    pub fn fail_on(&mut self, pin: GpioPin) {
        self.fail_pins.insert(pin);
    }

    /// Last level written to `pin`, or `None` if it was never written.
    pub fn level(&self, pin: GpioPin) -> Option<bool> {
        self.levels.get(&pin).copied()
    }

    /// Pins currently driven high.
    pub fn high_pins(&self) -> Vec<GpioPin> {
        self.levels
            .iter()
            .filter(|&(_, &high)| high)
            .map(|(&pin, _)| pin)
            .collect()
    }
}

impl PinDriver for BenchDriver {
    fn write(&mut self, pin: GpioPin, high: bool) -> HardwareResult<()> {
        if self.fail_pins.contains(&pin) {
            return Err(HardwareError::Driver {
                pin,
                message: "injected failure".to_string(),
            });
        }
        self.levels.insert(pin, high);
        Ok(())
    }
}
