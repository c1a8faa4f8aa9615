//! Event types: bag-fill windows and the two compiled actuation events.
//!
//! # Ordering contracts
//!
//! Both event types carry a **total order that other crates rely on**:
//!
//! - [`ValveEvent`]: ascending time, then `Close` before `Open` at the same
//!   instant (a bag closing frees its channel before another opens), then
//!   ascending bag number.
//! - [`PumpEvent`]: ascending time, then `Off` before `On`.
//!
//! The compiler sorts its timelines with these orders and the dispatcher
//! assumes them; changing either is a breaking change.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::error::CoreError;
use crate::ids::BagId;
use crate::timing::PumpTiming;

// ── BagWindow ─────────────────────────────────────────────────────────────────

/// One "fill bag N from A to B" request, as authored in the schedule file.
///
/// Invariant: `starts_at < ends_at`, enforced at construction.  Windows are
/// immutable; the compiler reads them, it never edits them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BagWindow {
    bag:       BagId,
    starts_at: NaiveDateTime,
    ends_at:   NaiveDateTime,
}

impl BagWindow {
    /// Validated constructor.
    pub fn new(
        bag:       BagId,
        starts_at: NaiveDateTime,
        ends_at:   NaiveDateTime,
    ) -> Result<Self, CoreError> {
        if starts_at < ends_at {
            Ok(Self { bag, starts_at, ends_at })
        } else {
            Err(CoreError::WindowOrder { bag, starts_at, ends_at })
        }
    }

    pub fn bag(&self) -> BagId {
        self.bag
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.starts_at
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.ends_at
    }

    /// The interval the pump must cover for this window: the fill window
    /// padded by the configured lead and lag.
    pub fn padded(&self, timing: &PumpTiming) -> (NaiveDateTime, NaiveDateTime) {
        (self.starts_at - timing.lead, self.ends_at + timing.lag)
    }

    /// When the pump has to start for this window.
    pub fn pump_start(&self, timing: &PumpTiming) -> NaiveDateTime {
        self.starts_at - timing.lead
    }
}

// ── ValveEvent ────────────────────────────────────────────────────────────────

/// Direction of a valve actuation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValveAction {
    Open,
    Close,
}

impl ValveAction {
    /// Sort rank at a shared instant: closing frees a channel before the
    /// next one opens.
    fn rank(self) -> u8 {
        match self {
            ValveAction::Close => 0,
            ValveAction::Open  => 1,
        }
    }
}

/// One entry in the compiled valve timeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValveEvent {
    pub at:     NaiveDateTime,
    pub bag:    BagId,
    pub action: ValveAction,
}

impl Ord for ValveEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.action.rank(), self.bag)
            .cmp(&(other.at, other.action.rank(), other.bag))
    }
}

impl PartialOrd for ValveEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── PumpEvent ─────────────────────────────────────────────────────────────────

/// Direction of a pump actuation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PumpAction {
    On,
    Off,
}

impl PumpAction {
    fn rank(self) -> u8 {
        match self {
            PumpAction::Off => 0,
            PumpAction::On  => 1,
        }
    }
}

/// One entry in the compiled pump timeline.
///
/// A valid timeline strictly alternates `On`/`Off` starting with `On`; the
/// compiler's interval merge guarantees this.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PumpEvent {
    pub at:     NaiveDateTime,
    pub action: PumpAction,
}

impl Ord for PumpEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.action.rank()).cmp(&(other.at, other.action.rank()))
    }
}

impl PartialOrd for PumpEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
