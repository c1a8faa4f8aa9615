//! `sampler-core` — foundational types for the bag sampler firmware.
//!
//! This crate is a dependency of every other `sampler-*` crate.  It has no
//! `sampler-*` dependencies and minimal external ones (only `chrono` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `BagId`                                               |
//! | [`event`]   | `BagWindow`, `ValveEvent`, `PumpEvent`, actions       |
//! | [`timing`]  | `PumpTiming`                                          |
//! | [`report`]  | `LineIssue`, `FileReport`                             |
//! | [`error`]   | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.     |

pub mod error;
pub mod event;
pub mod ids;
pub mod report;
pub mod timing;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use event::{BagWindow, PumpAction, PumpEvent, ValveAction, ValveEvent};
pub use ids::BagId;
pub use report::{FileReport, LineIssue};
pub use timing::PumpTiming;
