//! Unit tests for sampler-config.

use sampler_core::BagId;

use crate::{
    parse_device_config, parse_timing_config, ConfigError, GpioPin, NumberingMode,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const VALID_DEVICE: &str = "\
Identification number
9
Numbering mode
BCM
Bag numbers to valve pin numbers
1: 19, 2: 4, 3: 22
Pump pin number
13
Diode pin number
17
";

const VALID_TIMING: &str = "\
Diode light duration
3
Number of seconds pump starts pumping before valve opens
5
Number of seconds pump continues pumping after valve closes
5
Pump time off tolerance in seconds
10
";

fn issues_of(err: ConfigError) -> Vec<String> {
    match err {
        ConfigError::Invalid(report) => report.issues.iter().map(|i| i.to_string()).collect(),
        other => panic!("expected Invalid, got {other:?}"),
    }
}

// ── NumberingMode ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod pins {
    use super::*;

    #[test]
    fn parse_known_modes() {
        assert_eq!(NumberingMode::parse("BCM"), Some(NumberingMode::Bcm));
        assert_eq!(NumberingMode::parse("BOARD"), Some(NumberingMode::Board));
        assert_eq!(NumberingMode::parse("bcm"), None);
    }

    #[test]
    fn bcm_range() {
        assert!(NumberingMode::Bcm.is_valid_pin(GpioPin(0)));
        assert!(NumberingMode::Bcm.is_valid_pin(GpioPin(27)));
        assert!(!NumberingMode::Bcm.is_valid_pin(GpioPin(28)));
    }

    #[test]
    fn board_is_the_fixed_header_list() {
        assert!(NumberingMode::Board.is_valid_pin(GpioPin(3)));
        assert!(NumberingMode::Board.is_valid_pin(GpioPin(40)));
        // Power/ground positions are not GPIO lines.
        assert!(!NumberingMode::Board.is_valid_pin(GpioPin(1)));
        assert!(!NumberingMode::Board.is_valid_pin(GpioPin(2)));
        assert!(!NumberingMode::Board.is_valid_pin(GpioPin(4)));
    }
}

// ── Device configuration ──────────────────────────────────────────────────────

#[cfg(test)]
mod device {
    use super::*;

    #[test]
    fn valid_file_loads() {
        let config = parse_device_config(VALID_DEVICE, None).unwrap();
        assert_eq!(config.id, 9);
        assert_eq!(config.mode, NumberingMode::Bcm);
        assert_eq!(config.pump_pin, GpioPin(13));
        assert_eq!(config.light_pin, GpioPin(17));
        assert_eq!(config.valve_pins.len(), 3);
        assert_eq!(config.valve_pins[&BagId::new(2).unwrap()], GpioPin(4));
    }

    #[test]
    fn trailing_blank_lines_are_fine() {
        let text = format!("{VALID_DEVICE}\n\n");
        assert!(parse_device_config(&text, None).is_ok());
    }

    #[test]
    fn wrong_header_reported_with_line_number() {
        let text = VALID_DEVICE.replace("Numbering mode", "Numbering");
        let issues = issues_of(parse_device_config(&text, None).unwrap_err());
        assert!(issues.iter().any(|i| i.contains("Line 3")), "{issues:?}");
    }

    #[test]
    fn all_problems_reported_in_one_pass() {
        let text = "\
Identification number
zero
Numbering mode
BX
Bag numbers to valve pin numbers
14: 19
Pump pin number
13
Diode pin number
17
";
        let issues = issues_of(parse_device_config(text, None).unwrap_err());
        // Bad id, bad mode, bad bag number — all present at once.
        assert!(issues.iter().any(|i| i.contains("Line 2")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("Line 4")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("Line 6")), "{issues:?}");
    }

    #[test]
    fn pump_pin_out_of_range_for_bcm_rejected() {
        let text = VALID_DEVICE.replace("Pump pin number\n13", "Pump pin number\n99");
        let issues = issues_of(parse_device_config(&text, None).unwrap_err());
        assert!(issues.iter().any(|i| i.contains("Line 8")), "{issues:?}");
    }

    #[test]
    fn duplicate_pins_rejected() {
        let text = VALID_DEVICE.replace("Pump pin number\n13", "Pump pin number\n19");
        let issues = issues_of(parse_device_config(&text, None).unwrap_err());
        assert!(
            issues.iter().any(|i| i.contains("19") && i.contains("more than once")),
            "{issues:?}"
        );
    }

    #[test]
    fn out_of_range_bag_rejected() {
        let text = VALID_DEVICE.replace("1: 19", "14: 19");
        assert!(parse_device_config(&text, None).is_err());
    }

    #[test]
    fn bag_mapped_twice_rejected() {
        let text = VALID_DEVICE.replace("1: 19, 2: 4, 3: 22", "1: 19, 1: 4");
        let issues = issues_of(parse_device_config(&text, None).unwrap_err());
        assert!(issues.iter().any(|i| i.contains("mapped twice")), "{issues:?}");
    }

    #[test]
    fn board_mode_validates_against_header_positions() {
        let text = VALID_DEVICE
            .replace("BCM", "BOARD")
            .replace("1: 19, 2: 4, 3: 22", "1: 19, 2: 21")
            .replace("Pump pin number\n13", "Pump pin number\n12")
            .replace("Diode pin number\n17", "Diode pin number\n2");
        // Pin 2 is a power position in BOARD mode.
        let issues = issues_of(parse_device_config(&text, None).unwrap_err());
        assert!(issues.iter().any(|i| i.contains("Line 10")), "{issues:?}");
    }

    #[test]
    fn extra_lines_rejected() {
        let text = format!("{VALID_DEVICE}surprise\n");
        let issues = issues_of(parse_device_config(&text, None).unwrap_err());
        assert!(issues.iter().any(|i| i.contains("Line 11")), "{issues:?}");
    }
}

// ── Timing configuration ──────────────────────────────────────────────────────

#[cfg(test)]
mod timing {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn valid_file_loads() {
        let config = parse_timing_config(VALID_TIMING, None).unwrap();
        assert_eq!(config.light_duration, TimeDelta::seconds(3));
        assert_eq!(config.timing.lead, TimeDelta::seconds(5));
        assert_eq!(config.timing.lag, TimeDelta::seconds(5));
        assert_eq!(config.timing.gap_tolerance, TimeDelta::seconds(10));
    }

    #[test]
    fn zero_pump_parameters_are_valid() {
        let text = VALID_TIMING
            .replace("5\n", "0\n")
            .replace("10\n", "0\n");
        let config = parse_timing_config(&text, None).unwrap();
        assert_eq!(config.timing.lead, TimeDelta::zero());
        assert_eq!(config.timing.gap_tolerance, TimeDelta::zero());
    }

    #[test]
    fn zero_light_duration_rejected() {
        let text = VALID_TIMING.replace("Diode light duration\n3", "Diode light duration\n0");
        let issues = issues_of(parse_timing_config(&text, None).unwrap_err());
        assert!(issues.iter().any(|i| i.contains("Line 2")), "{issues:?}");
    }

    #[test]
    fn negative_tolerance_rejected() {
        let text = VALID_TIMING.replace("10", "-1");
        let issues = issues_of(parse_timing_config(&text, None).unwrap_err());
        assert!(issues.iter().any(|i| i.contains("Line 8")), "{issues:?}");
    }

    #[test]
    fn every_bad_section_reported() {
        let text = "\
Diode light duration
none
Number of seconds pump starts pumping before valve opens
-3
Number of seconds pump continues pumping after valve closes
5
Pump time off tolerance in seconds
later
";
        let issues = issues_of(parse_timing_config(text, None).unwrap_err());
        assert_eq!(
            issues.iter().filter(|i| i.contains("invalid value")).count(),
            3,
            "{issues:?}"
        );
    }
}
