//! `sampler-hardware` — the hardware boundary of the bag sampler.
//!
//! Physical GPIO access lives behind two seams:
//!
//! - [`PinDriver`] is the single register-write primitive.  Deployments
//!   supply an implementation for their platform; [`BenchDriver`] (records
//!   pin levels in memory) serves tests and hardware-less bench runs.
//! - [`Actuator`] is the call surface the dispatcher sees: pump on/off,
//!   valve open/close by bag number.  [`GpioActuator`] implements it over
//!   any `PinDriver` using the pin map validated at configuration load, so
//!   no pin number is ever interpreted in the dispatch path.
//!
//! All calls are fail-fast and never retried; a hardware error is fatal to
//! the current run.  [`FailSafe`] guarantees the all-off release on every
//! exit path, including panics.
//!
//! # Crate layout
//!
//! | Module        | Contents                                     |
//! |---------------|----------------------------------------------|
//! | [`driver`]    | `PinDriver`, `BenchDriver`                   |
//! | [`actuator`]  | `Actuator`, `GpioActuator`                   |
//! | [`guard`]     | `FailSafe`                                   |
//! | [`media`]     | `MediaWatch`, `MountWatch`                   |
//! | [`indicator`] | `flash_ready`                                |
//! | [`error`]     | `HardwareError`, `HardwareResult<T>`         |

pub mod actuator;
pub mod driver;
pub mod error;
pub mod guard;
pub mod indicator;
pub mod media;


pub use actuator::{Actuator, GpioActuator};
pub use driver::{BenchDriver, PinDriver};
pub use error::{HardwareError, HardwareResult};
pub use guard::FailSafe;
pub use indicator::flash_ready;
pub use media::{MediaWatch, MountWatch};
