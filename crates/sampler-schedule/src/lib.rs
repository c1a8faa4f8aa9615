//! `sampler-schedule` — schedule loading and timeline compilation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`loader`]   | `load_windows_csv`, `load_windows_reader`              |
//! | [`compiler`] | `compile`, `merge_pump_intervals`, `Schedule`          |
//! | [`error`]    | `ScheduleFileError`, `CompileError`, `WindowViolation` |
//!
//! # Compilation model (summary)
//!
//! A schedule file is a list of bag-fill windows.  Compilation produces two
//! sorted timelines consumed in lock-step by the dispatcher:
//!
//! ```text
//! windows ──┬─> valve timeline: Open @ starts_at, Close @ ends_at
//!           └─> pump timeline:  pad each window by lead/lag, merge
//!               intervals whose gap ≤ tolerance, emit On/Off per merge
//! ```
//!
//! Windows are re-read from the media on every (re)compilation; nothing in
//! this crate caches parsed state across reconfigurations.

pub mod compiler;
pub mod error;
pub mod loader;

#[cfg(test)]
mod tests;

pub use compiler::{compile, merge_pump_intervals, Schedule};
pub use error::{CompileError, ScheduleFileError, WindowViolation};
pub use loader::{load_windows_csv, load_windows_reader};
