use chrono::NaiveDateTime;
use thiserror::Error;

use sampler_config::ConfigError;
use sampler_hardware::HardwareError;
use sampler_schedule::{CompileError, ScheduleFileError};

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// A fault during a dispatch run.  Always fatal to the run; the dispatcher
/// has already driven the actuator to its safe state when this surfaces.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("actuator fault: {0}")]
    Actuator(#[from] HardwareError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

// ── Controller ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("required file {name} is not on the media")]
    MissingMediaFile { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ScheduleFile(#[from] ScheduleFileError),

    #[error(transparent)]
    Compile(CompileError),

    /// The freshly loaded schedule lies entirely in the past.  Terminal:
    /// the process ends through the fail-safe path rather than idling.
    #[error("no bag window remains after {cutoff}; nothing left to dispatch")]
    NoRemainingWork { cutoff: NaiveDateTime },
}

impl From<CompileError> for ControllerError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::NoRemainingWork { cutoff } => ControllerError::NoRemainingWork { cutoff },
            other => ControllerError::Compile(other),
        }
    }
}
