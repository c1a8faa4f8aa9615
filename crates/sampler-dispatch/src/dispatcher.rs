//! The event dispatcher: dual cursors over one compiled schedule.

use chrono::NaiveDateTime;

use sampler_core::{PumpAction, ValveAction};
use sampler_hardware::Actuator;
use sampler_schedule::Schedule;

use crate::error::{DispatchError, DispatchResult};
use crate::observer::{RunObserver, SkippedEvent};

// ── RunState ──────────────────────────────────────────────────────────────────

/// Lifecycle of one dispatch run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Schedule accepted, no tick processed yet.
    Idle,
    /// Both timelines still have unconsumed events.
    Running,
    /// One timeline is exhausted, the other still draining.
    Draining,
    /// Both timelines consumed, or the run was aborted.
    Stopped,
}

// ── MissedEventPolicy ─────────────────────────────────────────────────────────

/// What to do with events whose time had already passed when their tick
/// arrived (late start, tick overrun).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MissedEventPolicy {
    /// Fire every overdue event, in timeline order, in the tick that
    /// notices them.
    #[default]
    CatchUp,
    /// Consume overdue `On`/`Open` events without actuating and report them
    /// as skipped.  Overdue `Off`/`Close` events still fire: skipping those
    /// could strand a valve open or leave the pump running.
    SkipStale,
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Replays one [`Schedule`] against the clock, exactly once per event.
///
/// `tick` fires the earliest unconsumed event of either timeline while its
/// time is at or before `now` (`now >= at`), so a skipped or jittered tick
/// can never lose an event — it is handled at the next tick under the
/// configured [`MissedEventPolicy`].  At equal timestamps the pump cursor is
/// served before the valve cursor, matching the order the padding implies at
/// a cycle start.
///
/// The dispatcher holds no actuator; the caller lends one per call, keeping
/// ownership (and fail-safe release) in one place.
pub struct Dispatcher {
    schedule:     Schedule,
    valve_cursor: usize,
    pump_cursor:  usize,
    state:        RunState,
    policy:       MissedEventPolicy,
}

impl Dispatcher {
    pub fn new(schedule: Schedule, policy: MissedEventPolicy) -> Self {
        Self {
            schedule,
            valve_cursor: 0,
            pump_cursor:  0,
            state:        RunState::Idle,
            policy,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Process one clock tick at `now`.
    ///
    /// Idempotent with respect to consumed events: calling twice with the
    /// same `now` actuates nothing the second time.  After `Stopped` this is
    /// a no-op.  On an actuator fault the dispatcher aborts itself (all
    /// actuators off) before surfacing the error.
    pub fn tick<A, O>(
        &mut self,
        now:      NaiveDateTime,
        actuator: &mut A,
        observer: &mut O,
    ) -> DispatchResult<RunState>
    where
        A: Actuator,
        O: RunObserver,
    {
        if self.state == RunState::Stopped {
            return Ok(RunState::Stopped);
        }
        if self.state == RunState::Idle {
            self.transition(RunState::Running, observer);
        }

        loop {
            let due_pump = self
                .schedule
                .pump()
                .get(self.pump_cursor)
                .filter(|e| e.at <= now);
            let due_valve = self
                .schedule
                .valves()
                .get(self.valve_cursor)
                .filter(|e| e.at <= now);

            let serve_pump = match (due_pump, due_valve) {
                (Some(p), Some(v)) => p.at <= v.at,
                (Some(_), None)    => true,
                (None, Some(_))    => false,
                (None, None)       => break,
            };

            if serve_pump {
                self.fire_pump(now, actuator, observer)?;
            } else {
                self.fire_valve(now, actuator, observer)?;
            }
        }

        self.settle_state(observer);
        Ok(self.state)
    }

    /// Force `Stopped`, driving the actuator to its safe state (pump off,
    /// all valves closed).
    ///
    /// Idempotent: the shutdown calls are issued exactly once per run no
    /// matter how many times this is invoked or from which path.  Both
    /// calls are always attempted; the first failure is surfaced after.
    pub fn abort<A, O>(&mut self, actuator: &mut A, observer: &mut O) -> DispatchResult<()>
    where
        A: Actuator,
        O: RunObserver,
    {
        if self.state == RunState::Stopped {
            return Ok(());
        }
        self.transition(RunState::Stopped, observer);
        let pump_result = actuator.pump_off();
        let valve_result = actuator.close_all_valves();
        pump_result?;
        valve_result?;
        Ok(())
    }

    // ── Event firing ──────────────────────────────────────────────────────

    fn fire_pump<A, O>(
        &mut self,
        now:      NaiveDateTime,
        actuator: &mut A,
        observer: &mut O,
    ) -> DispatchResult<()>
    where
        A: Actuator,
        O: RunObserver,
    {
        let event = self.schedule.pump()[self.pump_cursor];
        if self.skips(event.at, now, event.action == PumpAction::On) {
            tracing::warn!(at = %event.at, action = ?event.action, "skipping stale pump event");
            observer.on_event_skipped(&SkippedEvent::Pump(event));
            self.pump_cursor += 1;
            return Ok(());
        }

        let result = match event.action {
            PumpAction::On  => actuator.pump_on(),
            PumpAction::Off => actuator.pump_off(),
        };
        if let Err(fault) = result {
            self.fail_safe(actuator, observer);
            return Err(DispatchError::Actuator(fault));
        }
        self.pump_cursor += 1;
        observer.on_pump_event(&event);
        Ok(())
    }

    fn fire_valve<A, O>(
        &mut self,
        now:      NaiveDateTime,
        actuator: &mut A,
        observer: &mut O,
    ) -> DispatchResult<()>
    where
        A: Actuator,
        O: RunObserver,
    {
        let event = self.schedule.valves()[self.valve_cursor];
        if self.skips(event.at, now, event.action == ValveAction::Open) {
            tracing::warn!(at = %event.at, bag = %event.bag, action = ?event.action, "skipping stale valve event");
            observer.on_event_skipped(&SkippedEvent::Valve(event));
            self.valve_cursor += 1;
            return Ok(());
        }

        let result = match event.action {
            ValveAction::Open  => actuator.valve_open(event.bag),
            ValveAction::Close => actuator.valve_close(event.bag),
        };
        if let Err(fault) = result {
            self.fail_safe(actuator, observer);
            return Err(DispatchError::Actuator(fault));
        }
        self.valve_cursor += 1;
        observer.on_valve_event(&event);
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Overdue (`at` strictly before `now`) activations are skipped under
    /// `SkipStale`; deactivations and on-time events always fire.
    fn skips(&self, at: NaiveDateTime, now: NaiveDateTime, is_activation: bool) -> bool {
        self.policy == MissedEventPolicy::SkipStale && is_activation && at < now
    }

    fn fail_safe<A, O>(&mut self, actuator: &mut A, observer: &mut O)
    where
        A: Actuator,
        O: RunObserver,
    {
        tracing::error!("actuator fault, forcing fail-safe shutdown");
        if let Err(shutdown) = self.abort(actuator, observer) {
            tracing::error!(error = %shutdown, "fail-safe shutdown itself failed");
        }
    }

    fn settle_state<O: RunObserver>(&mut self, observer: &mut O) {
        let pump_done = self.pump_cursor >= self.schedule.pump().len();
        let valve_done = self.valve_cursor >= self.schedule.valves().len();
        let next = match (pump_done, valve_done) {
            (true, true)   => RunState::Stopped,
            (false, false) => RunState::Running,
            _              => RunState::Draining,
        };
        self.transition(next, observer);
    }

    fn transition<O: RunObserver>(&mut self, to: RunState, observer: &mut O) {
        if self.state != to {
            tracing::info!(from = ?self.state, to = ?to, "dispatch state change");
            observer.on_state_change(self.state, to);
            self.state = to;
        }
    }
}
