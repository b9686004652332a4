//! Closed-loop tests: the service regulating the simulated boiler through
//! the phase-angle dimmer.

use crate::mock_hw::{MockStore, RecordingSink};

use espresso_core::adapters::display::HeadlessDisplay;
use espresso_core::adapters::simulation::{HALF_CYCLE_MS, SimulatedMachine};
use espresso_core::adapters::time::ManualClock;
use espresso_core::app::events::AppEvent;
use espresso_core::app::ports::{ClockPort, Page};
use espresso_core::app::service::MachineService;
use espresso_core::control::regulator::BoilerMode;

struct Bench {
    service: MachineService,
    sim: SimulatedMachine,
    display: HeadlessDisplay,
    store: MockStore,
    sink: RecordingSink,
    clock: ManualClock,
}

impl Bench {
    fn start() -> Self {
        let mut bench = Self {
            service: MachineService::with_default_controllers(),
            sim: SimulatedMachine::default(),
            display: HeadlessDisplay::new(),
            store: MockStore::default(),
            sink: RecordingSink::new(),
            clock: ManualClock::new(0),
        };
        bench.service.start(
            &bench.store,
            bench.sim.hardware_mut(),
            &mut bench.display,
            &mut bench.sink,
        );
        bench.display.set_page(Page::BrewingAuto);
        bench
    }

    fn run_for(&mut self, ms: u64) {
        let end = self.clock.now_ms() + ms;
        while self.clock.now_ms() < end {
            self.step();
        }
    }

    fn step(&mut self) {
        self.service.poll(
            self.clock.now_ms(),
            self.sim.hardware_mut(),
            &mut self.display,
            &mut self.store,
            &mut self.sink,
        );
        self.sim.advance(HALF_CYCLE_MS);
        self.clock.advance(HALF_CYCLE_MS);
    }
}

#[test]
fn boiler_settles_near_brew_target() {
    let mut bench = Bench::start();
    bench.run_for(300_000);

    let t = bench.sim.boiler_temp_c();
    assert!((t - 93.0).abs() < 3.0, "boiler at {t} C");
    assert!(
        bench.service.runtime_state().heater_duty < 128,
        "holding temperature needs a fraction of full power"
    );
    assert_eq!(bench.service.diagnostics().overruns(), 0);
}

#[test]
fn automatic_shot_builds_pressure() {
    let mut bench = Bench::start();
    bench.run_for(200_000);

    bench.sim.set_brew_switch(true);
    bench.run_for(10_000);
    assert!(bench.sim.line_pressure_bar() > 8.0);

    bench.sim.set_brew_switch(false);
    bench.run_for(3_000);
    assert!(bench.sim.line_pressure_bar() < 1.0);
    assert!(
        bench
            .sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::ShotFinished { .. }))
    );
    let t = bench.sim.boiler_temp_c();
    assert!((t - 93.0).abs() < 5.0, "boiler at {t} C after the shot");
}

#[test]
fn sensor_fault_stops_the_triac() {
    let mut bench = Bench::start();
    bench.run_for(5_000);

    bench.sim.inject_sensor_fault(2, 20);
    while bench.service.boiler_mode() != BoilerMode::Fault {
        bench.step();
    }
    let fired = bench.sim.fired_half_cycles();
    bench.run_for(1_000);

    assert_eq!(bench.sim.fired_half_cycles(), fired);

    bench.run_for(3_000);
    assert_eq!(bench.service.boiler_mode(), BoilerMode::Brew);
    assert_eq!(bench.sim.hardware().temperature.clears(), 20);
    assert!(bench.sim.fired_half_cycles() > fired);
}
