//! Background flash of the ready status light.

use std::thread::JoinHandle;
use std::time::Duration;

use sampler_config::GpioPin;

use crate::driver::PinDriver;

/// Light the status pin for `duration`, on a fire-and-forget thread.
///
/// The thread owns its driver handle and shares nothing mutable with the
/// dispatch loop; the only input from it is the (copied) duration.  Driver
/// failures are logged and dropped — a dead indicator must never affect
/// sampling.  The handle is returned for tests; the daemon never joins it.
pub fn flash_ready<D>(mut driver: D, pin: GpioPin, duration: Duration) -> JoinHandle<()>
where
    D: PinDriver + Send + 'static,
{
    std::thread::spawn(move || {
        if let Err(e) = driver.write(pin, true) {
            tracing::warn!(%pin, error = %e, "status light failed to turn on");
            return;
        }
        std::thread::sleep(duration);
        if let Err(e) = driver.write(pin, false) {
            tracing::warn!(%pin, error = %e, "status light failed to turn off");
        }
    })
}
