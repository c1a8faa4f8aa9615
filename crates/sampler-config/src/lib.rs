//! `sampler-config` — configuration loaders for the bag sampler.
//!
//! Two operator-facing files configure a sampler:
//!
//! - the **device configuration**, installed on the device itself and read
//!   once at process start: identification number, pin numbering mode, the
//!   bag→valve pin map, the pump pin, and the status-light pin;
//! - the **timing configuration**, carried on the removable media next to
//!   the schedule and re-read on every insertion: status-light duration and
//!   the three pump timing parameters.
//!
//! Both loaders validate the entire file and report every problem at once
//! (see [`sampler_core::report`]).  Pin validity and uniqueness are checked
//! here, once, so nothing downstream ever has to reason about pin numbers.
//!
//! # Crate layout
//!
//! | Module     | Contents                                       |
//! |------------|------------------------------------------------|
//! | [`pins`]   | `GpioPin`, `NumberingMode`                     |
//! | [`device`] | `DeviceConfig`, `load_device_config`           |
//! | [`timing`] | `TimingConfig`, `load_timing_config`           |
//! | [`error`]  | `ConfigError`, `ConfigResult<T>`               |

pub mod device;
pub mod error;
pub mod pins;
pub mod timing;

mod format;

#[cfg(test)]
mod tests;

pub use device::{load_device_config, parse_device_config, DeviceConfig};
pub use error::{ConfigError, ConfigResult};
pub use pins::{GpioPin, NumberingMode};
pub use timing::{load_timing_config, parse_timing_config, TimingConfig};
