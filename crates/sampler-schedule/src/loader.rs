//! Schedule file loader.
//!
//! # File format
//!
//! One header line, then one comma-separated record per bag-fill window:
//!
//! ```text
//! Bag number, Start filling, Stop filling
//! 1, 2024-06-01 10:00:00, 2024-06-01 10:00:30
//! # a comment — the whole line is ignored
//! 2, 2024-06-01 10:00:50, 2024-06-01 10:01:00
//! ```
//!
//! Lines beginning with `#` and blank lines are ignored.  Runs of internal
//! whitespace inside a timestamp field are collapsed before parsing, so
//! `2024-06-01   10:00:00` is accepted.
//!
//! Every invalid line contributes a [`LineIssue`] and the loader reports
//! them all at once (see [`sampler_core::report`]); a file only loads when
//! every record is valid.  Loaded windows are sorted by start time.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};

use sampler_core::{BagId, BagWindow, FileReport, LineIssue};

use crate::error::ScheduleFileError;

/// Expected header fields, in order.
pub const SCHEDULE_HEADER: [&str; 3] = ["Bag number", "Start filling", "Stop filling"];

/// Timestamp format used in schedule files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Load bag-fill windows from the schedule file at `path`.
pub fn load_windows_csv(path: &Path) -> Result<Vec<BagWindow>, ScheduleFileError> {
    let file = File::open(path).map_err(|source| ScheduleFileError::Missing {
        path: path.to_path_buf(),
        source,
    })?;
    let windows = load_windows_from(file, Some(path.to_path_buf()))?;
    tracing::info!(path = %path.display(), windows = windows.len(), "schedule file loaded");
    Ok(windows)
}

/// Like [`load_windows_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_windows_reader<R: Read>(reader: R) -> Result<Vec<BagWindow>, ScheduleFileError> {
    load_windows_from(reader, None)
}

fn load_windows_from<R: Read>(
    reader: R,
    path:   Option<PathBuf>,
) -> Result<Vec<BagWindow>, ScheduleFileError> {
    let mut csv_reader = ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut report = FileReport::new(path);

    // ── Header line ───────────────────────────────────────────────────────
    match csv_reader.headers() {
        Ok(headers) => {
            let got: Vec<&str> = headers.iter().collect();
            if got != SCHEDULE_HEADER {
                report.push(LineIssue::at(
                    1,
                    format!("header is invalid: {:?}", got.join(", ")),
                    "`Bag number, Start filling, Stop filling`",
                ));
            }
        }
        Err(e) => report.push(LineIssue::at(1, e.to_string(), "a valid header line")),
    }

    // ── Records ───────────────────────────────────────────────────────────
    let mut windows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match csv_reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                if let Some(window) = parse_record(&record, line, &mut report) {
                    windows.push(window);
                }
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                report.push(LineIssue::at(line, e.to_string(), "a parsable record"));
            }
        }
    }

    if !report.is_empty() {
        return Err(ScheduleFileError::Invalid(report));
    }

    windows.sort_by_key(|w| (w.starts_at(), w.bag()));
    Ok(windows)
}

// ── Record parsing ────────────────────────────────────────────────────────────

fn parse_record(
    record: &StringRecord,
    line:   u64,
    report: &mut FileReport,
) -> Option<BagWindow> {
    // A whitespace-only line trims to one empty field; treat like a blank line.
    if record.len() == 1 && record[0].is_empty() {
        return None;
    }
    if record.len() != 3 {
        report.push(LineIssue::at(
            line,
            format!("found {} comma-separated values", record.len()),
            "exactly 3: `<bag>, <start>, <stop>`",
        ));
        return None;
    }

    let bag = parse_bag(&record[0], line, report);
    let starts_at = parse_timestamp(&record[1], "start time", line, report);
    let ends_at = parse_timestamp(&record[2], "stop time", line, report);

    match (bag, starts_at, ends_at) {
        (Some(bag), Some(starts_at), Some(ends_at)) => {
            match BagWindow::new(bag, starts_at, ends_at) {
                Ok(window) => Some(window),
                Err(_) => {
                    report.push(LineIssue::at(
                        line,
                        format!("stop time {ends_at} is not after start time {starts_at}"),
                        "the stop time to be later than the start time",
                    ));
                    None
                }
            }
        }
        _ => None,
    }
}

fn parse_bag(raw: &str, line: u64, report: &mut FileReport) -> Option<BagId> {
    match raw.parse::<u8>().ok().and_then(|n| BagId::new(n).ok()) {
        Some(bag) => Some(bag),
        None => {
            report.push(LineIssue::at(
                line,
                format!("invalid bag number {raw:?}"),
                "a bag number 1..=13",
            ));
            None
        }
    }
}

fn parse_timestamp(
    raw:    &str,
    what:   &str,
    line:   u64,
    report: &mut FileReport,
) -> Option<NaiveDateTime> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match NaiveDateTime::parse_from_str(&collapsed, TIMESTAMP_FORMAT) {
        Ok(t) => Some(t),
        Err(_) => {
            report.push(LineIssue::at(
                line,
                format!("invalid {what} {raw:?}"),
                "`YYYY-MM-DD HH:MM:SS`",
            ));
            None
        }
    }
}
