//! espresso-sim — host simulator for the espresso control core
//!
//! Runs the real [`MachineService`] against a simulated boiler and pump in
//! simulated time and plays a scripted session:
//!
//! ```text
//!   warm-up (switches off) ─▶ shot (brew switch on) ─▶ steam (steam switch on) ─▶ settle
//! ```
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  SimulatedMachine   HeadlessDisplay   ConfigStore<Eeprom>    │
//! │  (HardwarePort)     (DisplayPort)     (ConfigPort)           │
//! │  ─────────────────── Port Trait Boundary ─────────────────   │
//! │              MachineService (pure logic)                     │
//! │  Regulator · BrewSequencer · Scheduler · Diagnostics         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The EEPROM image is read from and written back to `--eeprom` so settings
//! survive between runs. Log verbosity follows `RUST_LOG`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use espresso_core::adapters::display::HeadlessDisplay;
use espresso_core::adapters::eeprom::{DEFAULT_CAPACITY, EepromImage};
use espresso_core::adapters::log_sink::LogEventSink;
use espresso_core::adapters::simulation::{BoilerModel, HALF_CYCLE_MS, SimulatedMachine};
use espresso_core::adapters::time::ManualClock;
use espresso_core::app::commands::AppCommand;
use espresso_core::app::ports::{ClockPort, Page};
use espresso_core::app::service::MachineService;
use espresso_core::config::MachineConfig;
use espresso_core::persistence::ConfigStore;

/// Simulated espresso machine session
#[derive(Parser, Debug)]
#[command(name = "espresso-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Apply these settings (JSON) from the settings page after start-up
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// EEPROM image to load at start-up and write back on exit
    #[arg(long, value_name = "FILE")]
    eeprom: Option<PathBuf>,

    /// Seconds to heat with both switches off before pulling the shot
    #[arg(long, default_value_t = 120)]
    warmup_secs: u64,

    /// Seconds the brew switch stays on
    #[arg(long, default_value_t = 25)]
    shot_secs: u64,

    /// Seconds the steam switch stays on after the shot
    #[arg(long, default_value_t = 0)]
    steam_secs: u64,

    /// Pull the shot on the manual page at this pressure (bar)
    #[arg(long, value_name = "BAR")]
    manual_bar: Option<f32>,

    /// Make the probe report a fault for one second starting at this time
    #[arg(long, value_name = "SECS")]
    fault_at: Option<u64>,

    /// Starting boiler temperature
    #[arg(long, default_value_t = 22.0)]
    start_temp_c: f32,

    /// Pace the simulation against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Print the running configuration as JSON on exit
    #[arg(long)]
    print_config: bool,
}

/// One stretch of the scripted session.
#[derive(Debug, Clone, Copy)]
struct Stage {
    name: &'static str,
    secs: u64,
    brew: bool,
    steam: bool,
}

const SETTLE_SECS: u64 = 5;
const FAULT_READS: u32 = 10;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("espresso-sim v{}", env!("CARGO_PKG_VERSION"));

    // ── Persistence ───────────────────────────────────────────
    let image = match &args.eeprom {
        Some(path) if path.exists() => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading EEPROM image {}", path.display()))?;
            info!("EEPROM image loaded from {} ({} bytes)", path.display(), bytes.len());
            EepromImage::from_bytes(bytes)
        }
        _ => EepromImage::new(DEFAULT_CAPACITY),
    };
    let mut store = ConfigStore::new(image);

    // ── Adapters + service ────────────────────────────────────
    let mut sim = SimulatedMachine::new(BoilerModel {
        temp_c: args.start_temp_c,
        ..BoilerModel::default()
    });
    let mut display = HeadlessDisplay::new();
    let mut sink = LogEventSink::new();
    let clock = ManualClock::new(0);

    let mut service = MachineService::with_default_controllers();
    service.start(&store, sim.hardware_mut(), &mut display, &mut sink);

    if let Some(path) = &args.settings {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings: MachineConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        display.edit_settings(&settings);
        display.request(AppCommand::ApplySettings);
    }

    match args.manual_bar {
        Some(bar) => {
            display.set_page(Page::BrewingManual);
            display.set_manual_pressure(bar);
        }
        None => display.set_page(Page::BrewingAuto),
    }

    // ── Scripted session ──────────────────────────────────────
    let stages = [
        Stage {
            name: "warm-up",
            secs: args.warmup_secs,
            brew: false,
            steam: false,
        },
        Stage {
            name: "shot",
            secs: args.shot_secs,
            brew: true,
            steam: false,
        },
        Stage {
            name: "steam",
            secs: args.steam_secs,
            brew: false,
            steam: true,
        },
        Stage {
            name: "settle",
            secs: SETTLE_SECS,
            brew: false,
            steam: false,
        },
    ];
    let fault_at_ms = args.fault_at.map(|s| s * 1000);

    for stage in stages.iter().filter(|s| s.secs > 0) {
        info!("── {} ({} s) ──", stage.name, stage.secs);
        sim.set_brew_switch(stage.brew);
        sim.set_steam_switch(stage.steam);

        let end_ms = clock.now_ms() + stage.secs * 1000;
        while clock.now_ms() < end_ms {
            if fault_at_ms == Some(clock.now_ms()) {
                warn!("Injecting temperature sensor fault");
                sim.inject_sensor_fault(1, FAULT_READS);
            }

            service.poll(clock.now_ms(), sim.hardware_mut(), &mut display, &mut store, &mut sink);
            sim.advance(HALF_CYCLE_MS);
            clock.advance(HALF_CYCLE_MS);

            if args.realtime {
                std::thread::sleep(Duration::from_millis(HALF_CYCLE_MS));
            }
        }
        info!(
            "{} done: boiler {:.1} C, line {:.1} bar",
            stage.name,
            sim.boiler_temp_c(),
            sim.line_pressure_bar()
        );
    }

    // ── Summary ───────────────────────────────────────────────
    let diag = service.diagnostics();
    info!(
        "Session: {} cycles, {} faulted, {} overruns, {} saves ({} failed)",
        diag.cycles(),
        diag.faulted_cycles(),
        diag.overruns(),
        diag.saves(),
        diag.save_failures()
    );
    for fault in diag.recent_faults() {
        info!("  fault code {} at {} ms", fault.code, fault.at_ms);
    }

    if args.print_config {
        let json = serde_json::to_string_pretty(service.config())
            .context("serialising running configuration")?;
        println!("{json}");
    }

    if let Some(path) = &args.eeprom {
        std::fs::write(path, store.medium().as_bytes())
            .with_context(|| format!("writing EEPROM image {}", path.display()))?;
        info!("EEPROM image written to {}", path.display());
    }

    Ok(())
}
