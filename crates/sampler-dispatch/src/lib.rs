//! `sampler-dispatch` — the real-time half of the sampler.
//!
//! The [`Dispatcher`] walks a compiled [`Schedule`]'s two timelines in
//! lock-step with wall-clock time, one cursor per timeline, actuating
//! through the [`Actuator`] seam.  The [`Controller`] wraps it in the outer
//! 1 Hz loop: poll the media watch, rebuild the schedule on a fresh
//! insertion, tick the dispatcher otherwise, and fail safe on anything
//! unrecoverable.
//!
//! # Crate layout
//!
//! | Module         | Contents                                           |
//! |----------------|----------------------------------------------------|
//! | [`dispatcher`] | `Dispatcher`, `RunState`, `MissedEventPolicy`      |
//! | [`observer`]   | `RunObserver`, `NoopObserver`, `SkippedEvent`      |
//! | [`clock`]      | `Clock`, `WallClock`                               |
//! | [`controller`] | `Controller`, `StepOutcome`, `TICK_INTERVAL`       |
//! | [`error`]      | `DispatchError`, `ControllerError`                 |
//!
//! [`Schedule`]: sampler_schedule::Schedule
//! [`Actuator`]: sampler_hardware::Actuator

pub mod clock;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod observer;


pub use clock::{Clock, WallClock};
pub use controller::{Controller, StepOutcome, TICK_INTERVAL};
pub use dispatcher::{Dispatcher, MissedEventPolicy, RunState};
pub use error::{ControllerError, DispatchError, DispatchResult};
pub use observer::{NoopObserver, RunObserver, SkippedEvent};
