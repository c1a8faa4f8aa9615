//! Crate error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! via `From` or wrap it as one variant; both patterns are in use.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::ids::BagId;

/// Validation errors for the core value types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid bag number {0}: bag positions are 1..=13")]
    InvalidBagNumber(u8),

    #[error("bag {bag} window is not forward in time: starts {starts_at}, ends {ends_at}")]
    WindowOrder {
        bag:       BagId,
        starts_at: NaiveDateTime,
        ends_at:   NaiveDateTime,
    },

    #[error("{what} must be non-negative, got {seconds} s")]
    NegativeDuration { what: &'static str, seconds: i64 },
}

/// Shorthand result type for `sampler-core`.
pub type CoreResult<T> = Result<T, CoreError>;
