//! Timing configuration loader.
//!
//! Carried on the removable media next to the schedule file (named
//! `<id>_config.txt`) and re-read on every insertion.  Sample file:
//!
//! ```text
//! Diode light duration
//! 3
//! Number of seconds pump starts pumping before valve opens
//! 5
//! Number of seconds pump continues pumping after valve closes
//! 5
//! Pump time off tolerance in seconds
//! 10
//! ```
//!
//! All values are whole seconds.  The light duration must be positive; the
//! three pump parameters must be non-negative.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;

use sampler_core::{FileReport, LineIssue, PumpTiming};

use crate::error::{ConfigError, ConfigResult};
use crate::format;

/// Reloadable per-run timing parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// How long the ready light stays on after media is accepted.
    pub light_duration: TimeDelta,
    pub timing:         PumpTiming,
}

/// Load and validate the timing configuration file at `path`.
pub fn load_timing_config(path: &Path) -> ConfigResult<TimingConfig> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Missing {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_timing_config(&text, Some(path.to_path_buf()))?;
    tracing::info!(
        light_secs = config.light_duration.num_seconds(),
        lead_secs = config.timing.lead.num_seconds(),
        lag_secs = config.timing.lag.num_seconds(),
        tolerance_secs = config.timing.gap_tolerance.num_seconds(),
        "timing configuration loaded"
    );
    Ok(config)
}

/// Like [`load_timing_config`] but from in-memory text (used by tests).
pub fn parse_timing_config(text: &str, path: Option<PathBuf>) -> ConfigResult<TimingConfig> {
    let lines = format::lines_of(text);
    let mut report = FileReport::new(path);

    format::check_header(&lines, 0, "Diode light duration", &mut report);
    let light = format::parse_secs(&lines, 1, 1, "a positive integer", &mut report);

    format::check_header(
        &lines,
        2,
        "Number of seconds pump starts pumping before valve opens",
        &mut report,
    );
    let lead = format::parse_secs(&lines, 3, 0, "a non-negative integer", &mut report);

    format::check_header(
        &lines,
        4,
        "Number of seconds pump continues pumping after valve closes",
        &mut report,
    );
    let lag = format::parse_secs(&lines, 5, 0, "a non-negative integer", &mut report);

    format::check_header(&lines, 6, "Pump time off tolerance in seconds", &mut report);
    let tolerance = format::parse_secs(&lines, 7, 0, "a non-negative integer", &mut report);

    format::check_no_extra_lines(&lines, 8, &mut report);

    match (light, lead, lag, tolerance) {
        (Some(light), Some(lead), Some(lag), Some(tolerance)) if report.is_empty() => {
            match PumpTiming::from_secs(lead, lag, tolerance) {
                Ok(timing) => Ok(TimingConfig {
                    light_duration: TimeDelta::seconds(light),
                    timing,
                }),
                // Unreachable after the minimum checks above; reported
                // rather than asserted so a future format change cannot
                // turn it into a panic.
                Err(e) => {
                    report.push(LineIssue::file(e.to_string(), "non-negative durations"));
                    Err(ConfigError::Invalid(report))
                }
            }
        }
        _ => Err(ConfigError::Invalid(report)),
    }
}
