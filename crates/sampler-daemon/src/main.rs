//! sampler-daemon — process bootstrap for the bag sampler.
//!
//! Wires the pieces together and runs until the schedule completes (exit 0)
//! or a fatal error forces fail-safe shutdown (exit 1, actuators already
//! off).  Waiting for media, hot-swap reloads, and dispatch itself all live
//! in the library crates; this binary only assembles them.

mod logbook;

use std::path::PathBuf;

use anyhow::{Context, Result};

use sampler_config::{load_device_config, GpioPin, TimingConfig};
use sampler_core::{PumpEvent, ValveEvent};
use sampler_dispatch::{
    Controller, MissedEventPolicy, RunObserver, RunState, SkippedEvent, WallClock,
};
use sampler_hardware::media::default_mount_root;
use sampler_hardware::{flash_ready, BenchDriver, GpioActuator, MountWatch};

use logbook::Logbook;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default device configuration path on the deployed image; the first CLI
/// argument overrides it.
const DEVICE_CONFIG_PATH: &str = "/home/pi/hardware_configuration.txt";

/// Where the actuation logbook is written.
const LOGBOOK_DIR: &str = "/home/pi";

// ── Observers ─────────────────────────────────────────────────────────────────

/// Flashes the ready light for the configured duration whenever a schedule
/// loads, on a fire-and-forget thread with its own driver handle.
struct ReadyLight {
    driver: BenchDriver,
    pin:    GpioPin,
}

impl ReadyLight {
    fn flash(&self, timing: &TimingConfig) {
        match timing.light_duration.to_std() {
            Ok(duration) => {
                flash_ready(self.driver.clone(), self.pin, duration);
            }
            Err(_) => tracing::warn!("light duration not representable, skipping flash"),
        }
    }
}

/// The daemon's composite observer: logbook plus ready light.
struct DaemonObserver {
    logbook: Logbook,
    light:   ReadyLight,
}

impl RunObserver for DaemonObserver {
    fn on_valve_event(&mut self, event: &ValveEvent) {
        self.logbook.on_valve_event(event);
    }

    fn on_pump_event(&mut self, event: &PumpEvent) {
        self.logbook.on_pump_event(event);
    }

    fn on_event_skipped(&mut self, event: &SkippedEvent) {
        self.logbook.on_event_skipped(event);
    }

    fn on_state_change(&mut self, from: RunState, to: RunState) {
        self.logbook.on_state_change(from, to);
    }

    fn on_schedule_loaded(&mut self, timing: &TimingConfig) {
        self.light.flash(timing);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // 1. Logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 2. Device configuration.
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEVICE_CONFIG_PATH));
    let device = load_device_config(&config_path)
        .with_context(|| format!("loading device configuration {}", config_path.display()))?;

    // 3. Hardware.  `BenchDriver` is the hardware-less stand-in; a
    //    deployment swaps in its platform `PinDriver` here and nothing else
    //    changes.
    let driver = BenchDriver::new();
    let actuator = GpioActuator::new(driver.clone(), &device);
    let light = ReadyLight { driver, pin: device.light_pin };

    // 4. Actuation logbook.
    let logbook = Logbook::create(std::path::Path::new(LOGBOOK_DIR), device.id)
        .context("creating actuation logbook")?;
    tracing::info!(path = %logbook.path().display(), "logbook ready");
    let mut observer = DaemonObserver { logbook, light };

    // 5. Run.  The controller waits for media, reloads on hot-swap, and
    //    returns when the schedule drains; the fail-safe guard inside it
    //    drives everything off on any exit path.
    let media = MountWatch::new(default_mount_root());
    let mut controller = Controller::new(
        actuator,
        media,
        WallClock,
        device.id,
        MissedEventPolicy::CatchUp,
    );
    let outcome = controller.run(&mut observer);

    if let Some(e) = observer.logbook.take_error() {
        tracing::warn!(error = %e, "some logbook writes failed");
    }
    outcome.context("sampler run failed")?;

    tracing::info!("schedule completed, exiting");
    Ok(())
}
