//! Wall-clock seam.

use chrono::{NaiveDateTime, Timelike};

/// Source of the current time for the controller loop.
///
/// A trait so tests can drive the loop with scripted timestamps; production
/// code uses [`WallClock`].
pub trait Clock {
    fn now(&mut self) -> NaiveDateTime;
}

/// The local wall clock, truncated to whole seconds.
///
/// Schedule timestamps are authored in local civil time at second
/// resolution, so the dispatch comparison happens at the same resolution.
pub struct WallClock;

impl Clock for WallClock {
    fn now(&mut self) -> NaiveDateTime {
        let now = chrono::Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}
