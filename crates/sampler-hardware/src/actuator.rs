//! The actuator: pump and valve channels over a pin driver.

use std::collections::BTreeMap;

use sampler_config::{DeviceConfig, GpioPin};
use sampler_core::BagId;

use crate::driver::PinDriver;
use crate::error::{HardwareError, HardwareResult};

/// The call surface the dispatcher actuates against.
///
/// All methods are synchronous, fail-fast, and never retried by callers; a
/// failure is fatal to the current run.
pub trait Actuator {
    fn pump_on(&mut self) -> HardwareResult<()>;
    fn pump_off(&mut self) -> HardwareResult<()>;
    fn valve_open(&mut self, bag: BagId) -> HardwareResult<()>;
    fn valve_close(&mut self, bag: BagId) -> HardwareResult<()>;

    /// Close every mapped valve.  Must keep going past per-valve faults so
    /// one stuck channel cannot leave the others open; the first error is
    /// returned after all channels were attempted.
    fn close_all_valves(&mut self) -> HardwareResult<()>;

    fn pump_is_on(&self) -> bool;
    fn valve_is_open(&self, bag: BagId) -> bool;
}

// ── GpioActuator ──────────────────────────────────────────────────────────────

/// One output channel: a pin and the last commanded level.
#[derive(Clone, Copy, Debug)]
struct Channel {
    pin:    GpioPin,
    active: bool,
}

impl Channel {
    fn new(pin: GpioPin) -> Self {
        Self { pin, active: false }
    }

    fn set<D: PinDriver>(&mut self, driver: &mut D, active: bool) -> HardwareResult<()> {
        driver.write(self.pin, active)?;
        self.active = active;
        Ok(())
    }
}

/// Pump and valve channels mapped onto GPIO pins.
///
/// Generic over the [`PinDriver`] so the same actuation logic runs against
/// platform GPIO in the field and [`BenchDriver`][crate::BenchDriver] in
/// tests.  The pin map comes from [`DeviceConfig`], which has already
/// validated ranges and uniqueness; nothing here re-checks pin numbers.
pub struct GpioActuator<D: PinDriver> {
    driver: D,
    pump:   Channel,
    valves: BTreeMap<BagId, Channel>,
}

impl<D: PinDriver> GpioActuator<D> {
    pub fn new(driver: D, config: &DeviceConfig) -> Self {
        let valves = config
            .valve_pins
            .iter()
            .map(|(&bag, &pin)| (bag, Channel::new(pin)))
            .collect();
        Self {
            driver,
            pump: Channel::new(config.pump_pin),
            valves,
        }
    }

    /// The underlying pin driver; bench runs inspect recorded levels here.
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: PinDriver> Actuator for GpioActuator<D> {
    fn pump_on(&mut self) -> HardwareResult<()> {
        self.pump.set(&mut self.driver, true)?;
        tracing::info!(pin = %self.pump.pin, "pump on");
        Ok(())
    }

    fn pump_off(&mut self) -> HardwareResult<()> {
        self.pump.set(&mut self.driver, false)?;
        tracing::info!(pin = %self.pump.pin, "pump off");
        Ok(())
    }

    fn valve_open(&mut self, bag: BagId) -> HardwareResult<()> {
        let driver = &mut self.driver;
        let channel = self.valves.get_mut(&bag).ok_or(HardwareError::UnknownBag(bag))?;
        channel.set(driver, true)?;
        tracing::info!(%bag, pin = %channel.pin, "valve opened");
        Ok(())
    }

    fn valve_close(&mut self, bag: BagId) -> HardwareResult<()> {
        let driver = &mut self.driver;
        let channel = self.valves.get_mut(&bag).ok_or(HardwareError::UnknownBag(bag))?;
        channel.set(driver, false)?;
        tracing::info!(%bag, pin = %channel.pin, "valve closed");
        Ok(())
    }

    fn close_all_valves(&mut self) -> HardwareResult<()> {
        let mut first_error = None;
        for channel in self.valves.values_mut() {
            if let Err(e) = channel.set(&mut self.driver, false) {
                tracing::error!(pin = %channel.pin, error = %e, "valve failed to close");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            None => {
                tracing::info!("all valves closed");
                Ok(())
            }
            Some(e) => Err(e),
        }
    }

    fn pump_is_on(&self) -> bool {
        self.pump.active
    }

    fn valve_is_open(&self, bag: BagId) -> bool {
        self.valves.get(&bag).is_some_and(|c| c.active)
    }
}
