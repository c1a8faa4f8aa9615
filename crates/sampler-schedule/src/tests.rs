//! Unit tests for sampler-schedule.

use chrono::{NaiveDate, NaiveDateTime};

use sampler_core::{BagId, BagWindow, PumpAction, PumpTiming, ValveAction};

use crate::error::{CompileError, ScheduleFileError, WindowViolation};
use crate::{compile, load_windows_reader, merge_pump_intervals};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    day(1).and_hms_opt(h, m, s).unwrap()
}

fn window(bag: u8, starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> BagWindow {
    BagWindow::new(BagId::new(bag).unwrap(), starts_at, ends_at).unwrap()
}

fn timing(lead: i64, lag: i64, tolerance: i64) -> PumpTiming {
    PumpTiming::from_secs(lead, lag, tolerance).unwrap()
}

// ── Compiler: valve timeline ──────────────────────────────────────────────────

#[cfg(test)]
mod valve_timeline {
    use super::*;

    #[test]
    fn two_events_per_window_sorted_by_time() {
        let windows = vec![
            window(2, at(11, 0, 0), at(11, 0, 30)),
            window(1, at(10, 0, 0), at(10, 0, 30)),
        ];
        let schedule = compile(&windows, &timing(5, 5, 10), None).unwrap();

        let valves = schedule.valves();
        assert_eq!(valves.len(), 4);
        assert_eq!(
            valves.iter().map(|e| e.at).collect::<Vec<_>>(),
            vec![at(10, 0, 0), at(10, 0, 30), at(11, 0, 0), at(11, 0, 30)]
        );
        assert_eq!(valves[0].action, ValveAction::Open);
        assert_eq!(valves[1].action, ValveAction::Close);
    }

    #[test]
    fn alternates_open_close_per_bag() {
        let windows = vec![
            window(1, at(10, 0, 0), at(10, 0, 30)),
            window(1, at(10, 1, 0), at(10, 1, 30)),
            window(2, at(10, 2, 0), at(10, 2, 30)),
        ];
        let schedule = compile(&windows, &timing(0, 0, 0), None).unwrap();

        for bag in [1u8, 2] {
            let bag = BagId::new(bag).unwrap();
            let actions: Vec<ValveAction> = schedule
                .valves()
                .iter()
                .filter(|e| e.bag == bag)
                .map(|e| e.action)
                .collect();
            assert!(
                actions
                    .iter()
                    .enumerate()
                    .all(|(i, &a)| if i % 2 == 0 { a == ValveAction::Open } else { a == ValveAction::Close }),
                "bag {bag}: {actions:?}"
            );
        }
    }

    #[test]
    fn close_fires_before_open_at_shared_instant() {
        // Bag 1 hands over to bag 2 at exactly 10:00:30.
        let windows = vec![
            window(1, at(10, 0, 0), at(10, 0, 30)),
            window(2, at(10, 0, 30), at(10, 1, 0)),
        ];
        let schedule = compile(&windows, &timing(5, 5, 10), None).unwrap();

        let at_handover: Vec<_> = schedule
            .valves()
            .iter()
            .filter(|e| e.at == at(10, 0, 30))
            .collect();
        assert_eq!(at_handover.len(), 2);
        assert_eq!(at_handover[0].action, ValveAction::Close);
        assert_eq!(at_handover[0].bag, BagId::new(1).unwrap());
        assert_eq!(at_handover[1].action, ValveAction::Open);
        assert_eq!(at_handover[1].bag, BagId::new(2).unwrap());
    }
}

// ── Compiler: pump timeline ───────────────────────────────────────────────────

#[cfg(test)]
mod pump_timeline {
    use super::*;

    #[test]
    fn single_window_pads_into_previous_day() {
        let starts = day(1).and_hms_opt(0, 0, 0).unwrap();
        let ends = day(1).and_hms_opt(0, 0, 30).unwrap();
        let windows = vec![window(1, starts, ends)];
        let schedule = compile(&windows, &timing(5, 5, 10), None).unwrap();

        let pump = schedule.pump();
        assert_eq!(pump.len(), 2);
        assert_eq!(pump[0].action, PumpAction::On);
        assert_eq!(pump[0].at, day(1).pred_opt().unwrap().and_hms_opt(23, 59, 55).unwrap());
        assert_eq!(pump[1].action, PumpAction::Off);
        assert_eq!(pump[1].at, day(1).and_hms_opt(0, 0, 35).unwrap());
    }

    #[test]
    fn gap_equal_to_tolerance_merges() {
        // Padded: [09:59:55, 10:00:35] and [10:00:45, 10:01:05]; gap 10 s.
        let windows = vec![
            window(1, at(10, 0, 0), at(10, 0, 30)),
            window(2, at(10, 0, 50), at(10, 1, 0)),
        ];
        let schedule = compile(&windows, &timing(5, 5, 10), None).unwrap();

        let pump = schedule.pump();
        assert_eq!(pump.len(), 2, "one merged On/Off pair: {pump:?}");
        assert_eq!(pump[0].at, at(9, 59, 55));
        assert_eq!(pump[1].at, at(10, 1, 5));
    }

    #[test]
    fn gap_one_past_tolerance_stays_separate() {
        // Same shape, second window one second later: gap 11 s > 10 s.
        let windows = vec![
            window(1, at(10, 0, 0), at(10, 0, 30)),
            window(2, at(10, 0, 51), at(10, 1, 0)),
        ];
        let schedule = compile(&windows, &timing(5, 5, 10), None).unwrap();

        let pump = schedule.pump();
        assert_eq!(pump.len(), 4, "two separate cycles: {pump:?}");
        assert_eq!(pump[1].at, at(10, 0, 35));
        assert_eq!(pump[2].at, at(10, 0, 46));
    }

    #[test]
    fn strictly_alternates_starting_with_on() {
        let windows = vec![
            window(1, at(8, 0, 0), at(8, 0, 30)),
            window(2, at(9, 0, 0), at(9, 0, 30)),
            window(3, at(9, 0, 40), at(9, 1, 0)),
        ];
        let schedule = compile(&windows, &timing(5, 5, 10), None).unwrap();

        let pump = schedule.pump();
        assert!(!pump.is_empty());
        for (i, event) in pump.iter().enumerate() {
            let expected = if i % 2 == 0 { PumpAction::On } else { PumpAction::Off };
            assert_eq!(event.action, expected, "position {i}");
        }
        assert!(pump.windows(2).all(|w| w[0].at <= w[1].at));
    }

    #[test]
    fn nested_interval_does_not_shorten_the_merge() {
        // Bag 1 runs long; bag 2 touches it (tolerance covers the join) and
        // ends before bag 1's padded end would have.
        let intervals = vec![
            (at(10, 0, 0), at(10, 10, 0)),
            (at(10, 2, 0), at(10, 3, 0)),
        ];
        let merged = merge_pump_intervals(intervals, &timing(0, 0, 0));
        assert_eq!(merged, vec![(at(10, 0, 0), at(10, 10, 0))]);
    }

    #[test]
    fn merge_is_idempotent_on_its_own_output() {
        let intervals = vec![
            (at(10, 0, 0), at(10, 0, 10)),
            (at(10, 0, 15), at(10, 0, 30)),
            (at(10, 1, 0), at(10, 1, 30)),
        ];
        let tolerance_five = timing(0, 0, 5);
        let merged = merge_pump_intervals(intervals, &tolerance_five);
        // Re-running on its own output, even with tolerance 0, is a no-op.
        let zero = timing(0, 0, 0);
        assert_eq!(merge_pump_intervals(merged.clone(), &zero), merged);
        assert_eq!(merge_pump_intervals(merged.clone(), &tolerance_five), merged);
    }
}

// ── Compiler: rejection and cutoff ────────────────────────────────────────────

#[cfg(test)]
mod rejection {
    use super::*;

    #[test]
    fn empty_input_rejected() {
        assert_eq!(
            compile(&[], &timing(5, 5, 10), None),
            Err(CompileError::EmptySchedule)
        );
    }

    #[test]
    fn overlapping_windows_rejected() {
        let windows = vec![
            window(1, at(10, 0, 0), at(10, 0, 30)),
            window(2, at(10, 0, 20), at(10, 0, 40)),
        ];
        let err = compile(&windows, &timing(5, 5, 10), None).unwrap_err();
        match err {
            CompileError::Rejected(violations) => {
                assert_eq!(violations.len(), 1);
                assert!(matches!(violations[0], WindowViolation::Overlapping { .. }));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn long_window_overlap_found_beyond_immediate_neighbor() {
        // Bag 1 spans the whole hour; bag 3 starts well after bag 2 ends but
        // still inside bag 1.
        let windows = vec![
            window(1, at(10, 0, 0), at(11, 0, 0)),
            window(2, at(10, 5, 0), at(10, 6, 0)),
            window(3, at(10, 30, 0), at(10, 31, 0)),
        ];
        let err = compile(&windows, &timing(0, 0, 0), None).unwrap_err();
        match err {
            CompileError::Rejected(violations) => {
                assert_eq!(violations.len(), 2, "{violations:?}");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn touching_windows_are_not_overlapping() {
        let windows = vec![
            window(1, at(10, 0, 0), at(10, 0, 30)),
            window(2, at(10, 0, 30), at(10, 1, 0)),
        ];
        assert!(compile(&windows, &timing(0, 0, 0), None).is_ok());
    }

    #[test]
    fn cutoff_drops_windows_whose_pump_start_passed() {
        let windows = vec![
            window(1, at(10, 0, 0), at(10, 0, 30)),
            window(2, at(12, 0, 0), at(12, 0, 30)),
        ];
        // At 10:30 the first window's pump start (09:59:55) has passed.
        let schedule = compile(&windows, &timing(5, 5, 10), Some(at(10, 30, 0))).unwrap();
        assert_eq!(schedule.valves().len(), 2);
        assert_eq!(schedule.valves()[0].bag, BagId::new(2).unwrap());
    }

    #[test]
    fn cutoff_exactly_at_pump_start_drops_the_window() {
        let windows = vec![window(1, at(10, 0, 0), at(10, 0, 30))];
        // Pump start is 09:59:55; "not strictly after" the cutoff is dropped.
        let err = compile(&windows, &timing(5, 5, 10), Some(at(9, 59, 55))).unwrap_err();
        assert_eq!(err, CompileError::NoRemainingWork { cutoff: at(9, 59, 55) });
    }

    #[test]
    fn cutoff_before_pump_start_keeps_the_window() {
        let windows = vec![window(1, at(10, 0, 0), at(10, 0, 30))];
        let schedule = compile(&windows, &timing(5, 5, 10), Some(at(9, 59, 54))).unwrap();
        assert_eq!(schedule.pump().first().map(|e| e.at), Some(at(9, 59, 55)));
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;

    const VALID: &str = "\
Bag number, Start filling, Stop filling
# morning run
2, 2024-06-01 11:00:00, 2024-06-01 11:00:30

1, 2024-06-01 10:00:00, 2024-06-01 10:00:30
";

    fn issues_of(err: ScheduleFileError) -> Vec<String> {
        match err {
            ScheduleFileError::Invalid(report) => {
                report.issues.iter().map(|i| i.to_string()).collect()
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn loads_sorted_skipping_comments_and_blanks() {
        let windows = load_windows_reader(Cursor::new(VALID)).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].bag(), BagId::new(1).unwrap());
        assert_eq!(windows[0].starts_at(), at(10, 0, 0));
        assert_eq!(windows[1].bag(), BagId::new(2).unwrap());
    }

    #[test]
    fn collapses_internal_whitespace_in_timestamps() {
        let text = "\
Bag number, Start filling, Stop filling
1, 2024-06-01   10:00:00, 2024-06-01 10:00:30
";
        let windows = load_windows_reader(Cursor::new(text)).unwrap();
        assert_eq!(windows[0].starts_at(), at(10, 0, 0));
    }

    #[test]
    fn header_mismatch_is_an_issue_on_line_one() {
        let text = "\
Bag, Start, Stop
1, 2024-06-01 10:00:00, 2024-06-01 10:00:30
";
        let issues = issues_of(load_windows_reader(Cursor::new(text)).unwrap_err());
        assert!(issues.iter().any(|i| i.contains("Line 1")), "{issues:?}");
    }

    #[test]
    fn every_bad_line_reported_with_its_number() {
        let text = "\
Bag number, Start filling, Stop filling
14, 2024-06-01 10:00:00, 2024-06-01 10:00:30
1, not a time, 2024-06-01 10:00:30
2, 2024-06-01 10:00:00
3, 2024-06-01 10:00:30, 2024-06-01 10:00:00
";
        let issues = issues_of(load_windows_reader(Cursor::new(text)).unwrap_err());
        assert!(issues.iter().any(|i| i.contains("Line 2") && i.contains("bag number")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("Line 3") && i.contains("start time")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("Line 4") && i.contains("2 comma-separated")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("Line 5") && i.contains("not after")), "{issues:?}");
    }

    #[test]
    fn missing_file_is_a_distinct_error() {
        let err = crate::load_windows_csv(std::path::Path::new("/nonexistent/9_schedule.txt"))
            .unwrap_err();
        assert!(matches!(err, ScheduleFileError::Missing { .. }));
    }

    #[test]
    fn empty_body_loads_as_no_windows() {
        // The loader reports what it saw; rejecting an empty plan is the
        // compiler's call.
        let text = "Bag number, Start filling, Stop filling\n";
        let windows = load_windows_reader(Cursor::new(text)).unwrap();
        assert!(windows.is_empty());
    }
}
