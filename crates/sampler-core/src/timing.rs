//! Pump timing parameters.

use chrono::TimeDelta;

use crate::error::CoreError;

/// The three pump-scheduling durations, owned by configuration and read-only
/// to the compiler.
///
/// | Field           | Meaning                                              |
/// |-----------------|------------------------------------------------------|
/// | `lead`          | Pump starts this long before a valve opens.          |
/// | `lag`           | Pump keeps running this long after a valve closes.   |
/// | `gap_tolerance` | Maximum silent gap between two pump-on intervals     |
/// |                 | before they are kept as separate cycles.             |
///
/// The padding models plumbing lag (the pump must reach pressure before a
/// valve opens and keep clearing the line after it closes); the tolerance
/// avoids rapid on/off cycling when two fills sit close together.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PumpTiming {
    pub lead:          TimeDelta,
    pub lag:           TimeDelta,
    pub gap_tolerance: TimeDelta,
}

impl PumpTiming {
    /// Validated constructor: all three durations must be non-negative.
    pub fn new(
        lead:          TimeDelta,
        lag:           TimeDelta,
        gap_tolerance: TimeDelta,
    ) -> Result<Self, CoreError> {
        for (what, value) in [
            ("pump lead", lead),
            ("pump lag", lag),
            ("pump gap tolerance", gap_tolerance),
        ] {
            if value < TimeDelta::zero() {
                return Err(CoreError::NegativeDuration { what, seconds: value.num_seconds() });
            }
        }
        Ok(Self { lead, lag, gap_tolerance })
    }

    /// Convenience constructor from whole seconds (the unit used in the
    /// configuration file).
    pub fn from_secs(lead: i64, lag: i64, gap_tolerance: i64) -> Result<Self, CoreError> {
        Self::new(
            TimeDelta::seconds(lead),
            TimeDelta::seconds(lag),
            TimeDelta::seconds(gap_tolerance),
        )
    }
}
