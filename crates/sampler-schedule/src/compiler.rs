//! The schedule compiler: bag-fill windows → valve and pump timelines.
//!
//! # Pump interval merge
//!
//! Each window is padded to `[starts_at − lead, ends_at + lag]` so the pump
//! reaches pressure before a valve opens and keeps clearing the line after
//! it closes.  Padded intervals are then merged left to right: a gap of at
//! most `gap_tolerance` between consecutive intervals keeps the pump running
//! through it, because cycling the pump off and on across a short gap is
//! mechanically and electrically undesirable.  Equality at the boundary
//! (`gap == tolerance`) merges.
//!
//! All interval comparisons are on closed, padded intervals in civil time;
//! a window that starts shortly after midnight simply pads into the
//! previous day.

use chrono::NaiveDateTime;

use sampler_core::{BagWindow, PumpAction, PumpEvent, PumpTiming, ValveAction, ValveEvent};

use crate::error::{CompileError, WindowViolation};

// ── Schedule ──────────────────────────────────────────────────────────────────

/// The compiled pair of actuation timelines.
///
/// Owned exclusively by one dispatcher run and replaced atomically on
/// reconfiguration, never mutated in place.  Cursor positions are the
/// dispatcher's private state, not part of the schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    valves: Vec<ValveEvent>,
    pump:   Vec<PumpEvent>,
}

impl Schedule {
    /// Valve timeline, sorted by the [`ValveEvent`] total order.
    pub fn valves(&self) -> &[ValveEvent] {
        &self.valves
    }

    /// Pump timeline: strictly alternating On/Off pairs, sorted by time.
    pub fn pump(&self) -> &[PumpEvent] {
        &self.pump
    }

    /// When the last event of either timeline fires.
    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        let last_valve = self.valves.last().map(|e| e.at);
        let last_pump = self.pump.last().map(|e| e.at);
        last_valve.max(last_pump)
    }
}

// ── Compilation ───────────────────────────────────────────────────────────────

/// Compile `windows` into a [`Schedule`].
///
/// With `cutoff = None` the full schedule is compiled.  With
/// `cutoff = Some(t)` — used when dispatch starts mid-plan after a media
/// swap — every window whose padded pump start is not strictly after `t` is
/// dropped, and [`CompileError::NoRemainingWork`] is returned if nothing
/// survives.
///
/// Fails with [`CompileError::EmptySchedule`] for an empty input and
/// [`CompileError::Rejected`] (carrying *all* violations) when any two
/// windows overlap.  Windows that merely touch (`ends_at == starts_at`) are
/// fine: the valve ordering contract puts the Close before the Open.
pub fn compile(
    windows: &[BagWindow],
    timing:  &PumpTiming,
    cutoff:  Option<NaiveDateTime>,
) -> Result<Schedule, CompileError> {
    if windows.is_empty() {
        return Err(CompileError::EmptySchedule);
    }

    let mut sorted: Vec<&BagWindow> = windows.iter().collect();
    sorted.sort_by_key(|w| (w.starts_at(), w.bag()));

    // ── Validate: ordering (defensive) and overlaps ───────────────────────
    let mut violations: Vec<WindowViolation> = Vec::new();
    for &w in &sorted {
        if w.starts_at() >= w.ends_at() {
            violations.push(WindowViolation::Malformed { window: w.clone() });
        }
    }

    // Sweep with the running latest end so a long window is checked against
    // every later window it spans, not just its immediate neighbor.
    let mut latest: Option<&BagWindow> = None;
    for &w in &sorted {
        if let Some(prev) = latest {
            if w.starts_at() < prev.ends_at() {
                violations.push(WindowViolation::Overlapping {
                    first:  prev.clone(),
                    second: w.clone(),
                });
            }
        }
        latest = match latest {
            Some(prev) if prev.ends_at() >= w.ends_at() => Some(prev),
            _ => Some(w),
        };
    }
    if !violations.is_empty() {
        return Err(CompileError::Rejected(violations));
    }

    // ── Cutoff: drop windows whose pump start has already passed ──────────
    let active: Vec<&BagWindow> = match cutoff {
        None => sorted,
        Some(t) => {
            let kept: Vec<&BagWindow> = sorted
                .into_iter()
                .filter(|w| w.pump_start(timing) > t)
                .collect();
            if kept.is_empty() {
                return Err(CompileError::NoRemainingWork { cutoff: t });
            }
            kept
        }
    };

    // ── Valve timeline ────────────────────────────────────────────────────
    let mut valves = Vec::with_capacity(active.len() * 2);
    for w in &active {
        valves.push(ValveEvent { at: w.starts_at(), bag: w.bag(), action: ValveAction::Open });
        valves.push(ValveEvent { at: w.ends_at(), bag: w.bag(), action: ValveAction::Close });
    }
    valves.sort_unstable();

    // ── Pump timeline ─────────────────────────────────────────────────────
    let mut intervals: Vec<(NaiveDateTime, NaiveDateTime)> =
        active.iter().map(|w| w.padded(timing)).collect();
    intervals.sort_unstable_by_key(|iv| iv.0);
    let merged = merge_pump_intervals(intervals, timing);

    let mut pump = Vec::with_capacity(merged.len() * 2);
    for (on, off) in merged {
        pump.push(PumpEvent { at: on, action: PumpAction::On });
        pump.push(PumpEvent { at: off, action: PumpAction::Off });
    }

    tracing::info!(
        windows = active.len(),
        valve_events = valves.len(),
        pump_cycles = pump.len() / 2,
        "schedule compiled"
    );
    Ok(Schedule { valves, pump })
}

/// Greedy left-to-right merge of sorted pump-on intervals.
///
/// Consecutive intervals whose gap is at most `timing.gap_tolerance`
/// (inclusive) become one; the merged end is the maximum of both ends, so an
/// interval nested inside another never shortens it.  Output intervals are
/// disjoint with gaps strictly greater than the tolerance, which makes the
/// merge idempotent: re-merging its own output changes nothing, even with
/// tolerance zero.
pub fn merge_pump_intervals(
    intervals: Vec<(NaiveDateTime, NaiveDateTime)>,
    timing:    &PumpTiming,
) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    let mut merged: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::new();
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(current) if start - current.1 <= timing.gap_tolerance => {
                current.1 = current.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}
