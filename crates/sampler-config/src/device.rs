//! Device (hardware) configuration loader.
//!
//! Installed on the device itself and read once at process start.  Sample
//! file:
//!
//! ```text
//! Identification number
//! 9
//! Numbering mode
//! BCM
//! Bag numbers to valve pin numbers
//! 1: 19, 2: 4
//! Pump pin number
//! 13
//! Diode pin number
//! 17
//! ```
//!
//! Every pin is checked against the numbering mode and all pins (pump,
//! status light, valves) must be mutually distinct.  Validation happens
//! here, once; the dispatch path never reasons about pin numbers.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sampler_core::{BagId, FileReport, LineIssue};

use crate::error::{ConfigError, ConfigResult};
use crate::format;
use crate::pins::{GpioPin, NumberingMode};

/// Fixed per-device hardware description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Identification number; selects `<id>_schedule.txt` and
    /// `<id>_config.txt` on the inserted media.
    pub id:         u32,
    pub mode:       NumberingMode,
    /// Which GPIO pin drives the valve of each bag position.
    pub valve_pins: BTreeMap<BagId, GpioPin>,
    pub pump_pin:   GpioPin,
    /// Pin of the "ready" status light.
    pub light_pin:  GpioPin,
}

/// Load and validate the device configuration file at `path`.
pub fn load_device_config(path: &Path) -> ConfigResult<DeviceConfig> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Missing {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_device_config(&text, Some(path.to_path_buf()))?;
    tracing::info!(
        id = config.id,
        mode = %config.mode,
        valves = config.valve_pins.len(),
        "device configuration loaded"
    );
    Ok(config)
}

/// Like [`load_device_config`] but from in-memory text (used by tests).
pub fn parse_device_config(text: &str, path: Option<PathBuf>) -> ConfigResult<DeviceConfig> {
    let lines = format::lines_of(text);
    let mut report = FileReport::new(path);

    // ── Identification number ─────────────────────────────────────────────
    format::check_header(&lines, 0, "Identification number", &mut report);
    let id = {
        let raw = format::value_line(&lines, 1).unwrap_or("");
        match raw.parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                report.push(LineIssue::at(
                    2,
                    format!("invalid identification number {raw:?}"),
                    "a positive integer",
                ));
                None
            }
        }
    };

    // ── Numbering mode ────────────────────────────────────────────────────
    format::check_header(&lines, 2, "Numbering mode", &mut report);
    let mode = {
        let raw = format::value_line(&lines, 3).unwrap_or("");
        match NumberingMode::parse(raw) {
            Some(m) => Some(m),
            None => {
                report.push(LineIssue::at(
                    4,
                    format!("invalid numbering mode {raw:?}"),
                    "`BCM` or `BOARD`",
                ));
                None
            }
        }
    };

    // ── Bag numbers to valve pin numbers ──────────────────────────────────
    format::check_header(&lines, 4, "Bag numbers to valve pin numbers", &mut report);
    let valve_pins = parse_valve_map(format::value_line(&lines, 5), 6, mode, &mut report);

    // ── Pump pin number ───────────────────────────────────────────────────
    format::check_header(&lines, 6, "Pump pin number", &mut report);
    let pump_pin = parse_pin(&lines, 7, mode, &mut report);

    // ── Diode pin number ──────────────────────────────────────────────────
    format::check_header(&lines, 8, "Diode pin number", &mut report);
    let light_pin = parse_pin(&lines, 9, mode, &mut report);

    format::check_no_extra_lines(&lines, 10, &mut report);

    // ── Pin uniqueness across all sections ────────────────────────────────
    check_unique_pins(pump_pin, light_pin, &valve_pins, &mut report);

    match (id, mode, pump_pin, light_pin) {
        (Some(id), Some(mode), Some(pump_pin), Some(light_pin)) if report.is_empty() => {
            Ok(DeviceConfig { id, mode, valve_pins, pump_pin, light_pin })
        }
        _ => Err(ConfigError::Invalid(report)),
    }
}

// ── Section parsers ───────────────────────────────────────────────────────────

fn parse_pin(
    lines:  &[&str],
    idx:    usize,
    mode:   Option<NumberingMode>,
    report: &mut FileReport,
) -> Option<GpioPin> {
    let raw = format::value_line(lines, idx).unwrap_or("");
    let parsed = raw.parse::<u8>().ok().map(GpioPin);
    // Without a valid mode the file is already failing; skip the range check.
    let valid = parsed
        .filter(|&pin| mode.is_none_or(|m| m.is_valid_pin(pin)));
    if valid.is_none() {
        report.push(LineIssue::at(
            idx as u64 + 1,
            format!("invalid pin number {raw:?}"),
            "a valid GPIO number in the configured numbering mode",
        ));
    }
    valid
}

/// Parse the `1: 19, 2: 4` valve-map line.  All problems on the line are
/// folded into one issue; whatever parsed cleanly is still returned so the
/// uniqueness check can consider it.
fn parse_valve_map(
    raw:     Option<&str>,
    line_no: u64,
    mode:    Option<NumberingMode>,
    report:  &mut FileReport,
) -> BTreeMap<BagId, GpioPin> {
    let mut map = BTreeMap::new();
    let mut problems: Vec<String> = Vec::new();

    match raw.filter(|s| !s.is_empty()) {
        None => problems.push("no bag-to-pin pairs given".to_string()),
        Some(raw) => {
            for pair in raw.split(',') {
                let Some((bag_part, pin_part)) = pair.split_once(':') else {
                    problems.push(format!("`{}` is not a `<bag>: <pin>` pair", pair.trim()));
                    continue;
                };
                let bag = bag_part
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .and_then(|n| BagId::new(n).ok());
                let pin = pin_part
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .map(GpioPin)
                    .filter(|&p| mode.is_none_or(|m| m.is_valid_pin(p)));
                match (bag, pin) {
                    (Some(bag), Some(pin)) => {
                        if map.insert(bag, pin).is_some() {
                            problems.push(format!("bag {bag} is mapped twice"));
                        }
                    }
                    _ => problems.push(format!("`{}` has a bad bag or pin number", pair.trim())),
                }
            }
        }
    }

    if !problems.is_empty() {
        report.push(LineIssue::at(
            line_no,
            problems.join("; "),
            "`<bag>: <pin>, ...` with bags 1..=13 and pins valid for the numbering mode",
        ));
    }
    map
}

fn check_unique_pins(
    pump_pin:   Option<GpioPin>,
    light_pin:  Option<GpioPin>,
    valve_pins: &BTreeMap<BagId, GpioPin>,
    report:     &mut FileReport,
) {
    let mut counts: BTreeMap<GpioPin, usize> = BTreeMap::new();
    for pin in pump_pin
        .into_iter()
        .chain(light_pin)
        .chain(valve_pins.values().copied())
    {
        *counts.entry(pin).or_default() += 1;
    }
    let duplicates: Vec<String> = counts
        .into_iter()
        .filter(|&(_, n)| n > 1)
        .map(|(pin, _)| pin.to_string())
        .collect();
    if !duplicates.is_empty() {
        report.push(LineIssue::file(
            format!("pin number(s) {} used more than once", duplicates.join(", ")),
            "every pin to appear in exactly one section",
        ));
    }
}
