//! Strongly typed bag identifier.

use std::fmt;

use crate::error::CoreError;

/// Identifies one sample bag (and the valve channel that feeds it).
///
/// The manifold has thirteen bag positions; valid numbers are `1..=13`.
/// The inner value is private so that every `BagId` in the system has been
/// range-checked exactly once, at construction.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BagId(u8);

impl BagId {
    /// Highest bag position present on the manifold.
    pub const MAX: u8 = 13;

    /// Validated constructor: bag numbers are `1..=13`.
    pub fn new(n: u8) -> Result<Self, CoreError> {
        if (1..=Self::MAX).contains(&n) {
            Ok(BagId(n))
        } else {
            Err(CoreError::InvalidBagNumber(n))
        }
    }

    /// The bag number as written in schedule and configuration files.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for BagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
