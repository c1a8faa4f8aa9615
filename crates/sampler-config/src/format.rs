//! Helpers for the section format shared by both configuration files: a
//! fixed sequence of header lines, each followed by one value line.

use sampler_core::{FileReport, LineIssue};

/// Whole file as trimmed lines.
pub(crate) fn lines_of(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).collect()
}

/// Check the section header at 0-based index `idx`.
pub(crate) fn check_header(lines: &[&str], idx: usize, want: &str, report: &mut FileReport) {
    match lines.get(idx) {
        Some(&line) if line == want => {}
        _ => report.push(LineIssue::at(idx as u64 + 1, "header is invalid", format!("`{want}`"))),
    }
}

/// The value line at 0-based index `idx`, if the file reaches that far.
pub(crate) fn value_line<'a>(lines: &[&'a str], idx: usize) -> Option<&'a str> {
    lines.get(idx).copied()
}

/// Parse a section value as whole seconds, at least `minimum`.
///
/// Records an issue (and returns `None`) for a missing line, a non-integer,
/// or a value below `minimum`.
pub(crate) fn parse_secs(
    lines:    &[&str],
    idx:      usize,
    minimum:  i64,
    expected: &str,
    report:   &mut FileReport,
) -> Option<i64> {
    let raw = value_line(lines, idx).unwrap_or("");
    match raw.parse::<i64>() {
        Ok(n) if n >= minimum => Some(n),
        _ => {
            report.push(LineIssue::at(
                idx as u64 + 1,
                format!("invalid value {raw:?}"),
                expected.to_string(),
            ));
            None
        }
    }
}

/// Everything past the last section must be blank.
pub(crate) fn check_no_extra_lines(lines: &[&str], from: usize, report: &mut FileReport) {
    for (i, line) in lines.iter().enumerate().skip(from) {
        if !line.is_empty() {
            report.push(LineIssue::at(
                i as u64 + 1,
                "extra lines are not allowed",
                "no further content",
            ));
        }
    }
}
