//! Run observer trait for progress reporting and data collection.

use sampler_config::TimingConfig;
use sampler_core::{PumpEvent, ValveEvent};

use crate::dispatcher::RunState;

/// An event consumed without actuation under
/// [`MissedEventPolicy::SkipStale`][crate::MissedEventPolicy::SkipStale].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkippedEvent {
    Valve(ValveEvent),
    Pump(PumpEvent),
}

/// Callbacks invoked by the dispatcher and controller at key points.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  This is the structured reporting
/// channel; diagnostics go to `tracing`.
///
/// # Example — actuation printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl RunObserver for Printer {
///     fn on_valve_event(&mut self, event: &ValveEvent) {
///         println!("{} bag {} {:?}", event.at, event.bag, event.action);
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called after a valve event fired successfully.
    fn on_valve_event(&mut self, _event: &ValveEvent) {}

    /// Called after a pump event fired successfully.
    fn on_pump_event(&mut self, _event: &PumpEvent) {}

    /// Called when a stale event is consumed without actuation.
    fn on_event_skipped(&mut self, _event: &SkippedEvent) {}

    /// Called on every dispatcher state transition.
    fn on_state_change(&mut self, _from: RunState, _to: RunState) {}

    /// Called by the controller after a schedule (re)load succeeded,
    /// before the first tick against it.
    fn on_schedule_loaded(&mut self, _timing: &TimingConfig) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
