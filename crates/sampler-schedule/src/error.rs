use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

use sampler_core::{BagWindow, FileReport};

// ── Loader errors ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScheduleFileError {
    #[error("schedule file is missing: {path}: {source}")]
    Missing {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Invalid(FileReport),
}

// ── Compiler errors ───────────────────────────────────────────────────────────

/// One reason a window (or pair of windows) cannot be scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowViolation {
    /// `starts_at >= ends_at`.  Unreachable through the public constructors,
    /// re-asserted here so a future bypass cannot compile nonsense.
    Malformed { window: BagWindow },

    /// `second` starts before `first` has finished.  One pump and one valve
    /// set cannot serve two open windows at once.
    Overlapping { first: BagWindow, second: BagWindow },
}

impl fmt::Display for WindowViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowViolation::Malformed { window } => write!(
                f,
                "bag {} window is not forward in time: starts {}, ends {}",
                window.bag(),
                window.starts_at(),
                window.ends_at()
            ),
            WindowViolation::Overlapping { first, second } => write!(
                f,
                "bag {} window ending {} overlaps bag {} window starting {}",
                first.bag(),
                first.ends_at(),
                second.bag(),
                second.starts_at()
            ),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("schedule contains no bag windows")]
    EmptySchedule,

    /// Every window's padded pump start has already elapsed; there is
    /// nothing left to dispatch.
    #[error("no bag window remains after {cutoff}")]
    NoRemainingWork { cutoff: NaiveDateTime },

    /// All ordering and overlap violations found, reported together.
    #[error("schedule rejected:\n{}", render(.0))]
    Rejected(Vec<WindowViolation>),
}

fn render(violations: &[WindowViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("- {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
