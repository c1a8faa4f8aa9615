//! CSV actuation logbook.
//!
//! One row per fired (or skipped) event, so a field engineer can audit what
//! the device actually did against what the schedule asked for.  Rows are
//! flushed per write; the device can lose power at any second.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::Writer;

use sampler_core::{PumpAction, PumpEvent, ValveAction, ValveEvent};
use sampler_dispatch::{RunObserver, SkippedEvent};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A [`RunObserver`] that appends every event to `actuations_<id>.csv`.
///
/// Observer methods have no return value, so write errors are stored
/// internally; check with [`take_error`][Self::take_error] after the run.
/// A failing logbook never disturbs dispatch.
pub struct Logbook {
    writer:     Writer<File>,
    path:       PathBuf,
    last_error: Option<csv::Error>,
}

impl Logbook {
    /// Create (or truncate) the logbook for device `id` under `dir`.
    pub fn create(dir: &Path, id: u32) -> Result<Self, csv::Error> {
        let path = dir.join(format!("actuations_{id}.csv"));
        let mut writer = Writer::from_path(&path)?;
        writer.write_record(["time", "kind", "bag", "action"])?;
        writer.flush()?;
        Ok(Self { writer, path, last_error: None })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The first stored write error, if any.
    pub fn take_error(&mut self) -> Option<csv::Error> {
        self.last_error.take()
    }

    fn record(&mut self, at: NaiveDateTime, kind: &str, bag: &str, action: &str) {
        let row = [at.format(TIME_FORMAT).to_string(), kind.to_string(), bag.to_string(), action.to_string()];
        let mut result = self.writer.write_record(&row);
        if result.is_ok() {
            result = self.writer.flush().map_err(csv::Error::from);
        }
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl RunObserver for Logbook {
    fn on_valve_event(&mut self, event: &ValveEvent) {
        let action = match event.action {
            ValveAction::Open  => "open",
            ValveAction::Close => "close",
        };
        self.record(event.at, "valve", &event.bag.to_string(), action);
    }

    fn on_pump_event(&mut self, event: &PumpEvent) {
        let action = match event.action {
            PumpAction::On  => "on",
            PumpAction::Off => "off",
        };
        self.record(event.at, "pump", "", action);
    }

    fn on_event_skipped(&mut self, event: &SkippedEvent) {
        match event {
            SkippedEvent::Valve(e) => {
                self.record(e.at, "valve", &e.bag.to_string(), "skipped");
            }
            SkippedEvent::Pump(e) => {
                self.record(e.at, "pump", "", "skipped");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
