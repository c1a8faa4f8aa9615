//! The reconfiguration controller: the outer 1 Hz loop around the
//! dispatcher.
//!
//! Each iteration polls the media watch.  A fresh insertion aborts any
//! active run *before* touching the new data, then reloads the timing
//! configuration and schedule from the media, recompiles with the current
//! instant as cutoff (windows whose pump start has already passed are
//! dropped), and starts a new dispatcher.  Nothing is cached across
//! reloads; both files are re-read every insertion.

use std::time::Duration;

use chrono::NaiveDateTime;

use sampler_config::load_timing_config;
use sampler_hardware::{Actuator, FailSafe, MediaWatch};
use sampler_schedule::{compile, load_windows_csv};

use crate::clock::Clock;
use crate::dispatcher::{Dispatcher, MissedEventPolicy, RunState};
use crate::error::ControllerError;
use crate::observer::RunObserver;

/// Cadence of the dispatch loop.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What one controller iteration did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// No media and no active run; still waiting.
    Waiting,
    /// A fresh insertion was processed and a new dispatcher started.
    Reloaded,
    /// The active dispatcher was ticked.
    Ticked(RunState),
    /// The active schedule drained to completion.
    Completed,
}

/// Owns the actuator (fail-safe guarded), the media watch, and the clock;
/// drives dispatch runs until the schedule completes or a fatal error
/// forces shutdown.
pub struct Controller<A: Actuator, M: MediaWatch, C: Clock> {
    actuator:   FailSafe<A>,
    media:      M,
    clock:      C,
    device_id:  u32,
    policy:     MissedEventPolicy,
    dispatcher: Option<Dispatcher>,
}

impl<A: Actuator, M: MediaWatch, C: Clock> Controller<A, M, C> {
    pub fn new(
        actuator:  A,
        media:     M,
        clock:     C,
        device_id: u32,
        policy:    MissedEventPolicy,
    ) -> Self {
        Self {
            actuator: FailSafe::new(actuator),
            media,
            clock,
            device_id,
            policy,
            dispatcher: None,
        }
    }

    /// Run until the schedule completes (`Ok`) or a fatal error surfaces
    /// (`Err`, actuators already off).
    pub fn run<O: RunObserver>(&mut self, observer: &mut O) -> Result<(), ControllerError> {
        loop {
            let now = self.clock.now();
            if self.step(now, observer)? == StepOutcome::Completed {
                return Ok(());
            }
            std::thread::sleep(TICK_INTERVAL);
        }
    }

    /// One loop iteration at `now`.  Separated from [`run`][Self::run] so
    /// tests can drive time directly.
    pub fn step<O: RunObserver>(
        &mut self,
        now:      NaiveDateTime,
        observer: &mut O,
    ) -> Result<StepOutcome, ControllerError> {
        if self.media.was_reinserted() {
            self.reload(now, observer)?;
            return Ok(StepOutcome::Reloaded);
        }

        match self.dispatcher.as_mut() {
            None => Ok(StepOutcome::Waiting),
            Some(dispatcher) => {
                let state = dispatcher.tick(now, &mut *self.actuator, observer)?;
                if state == RunState::Stopped {
                    tracing::info!("schedule complete");
                    Ok(StepOutcome::Completed)
                } else {
                    Ok(StepOutcome::Ticked(state))
                }
            }
        }
    }

    /// Abort the active run, re-read both files from the media, compile a
    /// schedule restricted to what is still ahead of `now`, and start a new
    /// dispatcher against it.
    fn reload<O: RunObserver>(
        &mut self,
        now:      NaiveDateTime,
        observer: &mut O,
    ) -> Result<(), ControllerError> {
        // Safety first: silence the actuators before trusting new data.
        if let Some(mut dispatcher) = self.dispatcher.take() {
            dispatcher.abort(&mut *self.actuator, observer)?;
        }

        let config_path = self
            .media
            .config_path(self.device_id)
            .ok_or_else(|| ControllerError::MissingMediaFile {
                name: format!("{}_config.txt", self.device_id),
            })?;
        let schedule_path = self
            .media
            .schedule_path(self.device_id)
            .ok_or_else(|| ControllerError::MissingMediaFile {
                name: format!("{}_schedule.txt", self.device_id),
            })?;

        let timing_config = load_timing_config(&config_path)?;
        let windows = load_windows_csv(&schedule_path)?;
        let schedule = compile(&windows, &timing_config.timing, Some(now))?;

        tracing::info!(
            valve_events = schedule.valves().len(),
            pump_events = schedule.pump().len(),
            cutoff = %now,
            ends_at = ?schedule.ends_at(),
            "dispatch restarting against new schedule"
        );
        observer.on_schedule_loaded(&timing_config);
        self.dispatcher = Some(Dispatcher::new(schedule, self.policy));
        Ok(())
    }
}
