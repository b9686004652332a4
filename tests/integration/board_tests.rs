//! Integration tests for the GPIO composition: SSR heater and front-panel
//! switches on embedded-hal pins behind `HardwareAdapter`.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use crate::mock_hw::{MockStore, RecordingSink};

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use espresso_core::adapters::display::HeadlessDisplay;
use espresso_core::adapters::hardware::{HardwareAdapter, NoPressureTransducer};
use espresso_core::adapters::simulation::{SimProbe, SimPump};
use espresso_core::app::service::MachineService;
use espresso_core::drivers::heater::SsrHeater;
use espresso_core::fsm::BrewPhase;
use espresso_core::sensors::switch::{Polarity, SwitchSensor};

/// Pin whose level the test controls after handing it to a driver.
#[derive(Clone, Default)]
struct SharedPin(Rc<Cell<bool>>);

impl SharedPin {
    fn set(&self, high: bool) {
        self.0.set(high);
    }

    fn is_set_high(&self) -> bool {
        self.0.get()
    }
}

impl ErrorType for SharedPin {
    type Error = Infallible;
}

impl InputPin for SharedPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

impl OutputPin for SharedPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

type Board = HardwareAdapter<
    SimProbe,
    SwitchSensor<SharedPin>,
    SwitchSensor<SharedPin>,
    SsrHeater<SharedPin>,
    SimPump,
    NoPressureTransducer,
>;

struct Pins {
    brew: SharedPin,
    steam: SharedPin,
    ssr: SharedPin,
}

fn board() -> (Board, Pins) {
    let pins = Pins {
        brew: SharedPin::default(),
        steam: SharedPin::default(),
        ssr: SharedPin::default(),
    };
    // Panel switches pull to ground when closed.
    pins.brew.set(true);
    pins.steam.set(true);
    let hw = HardwareAdapter::new(
        SimProbe::default(),
        SwitchSensor::new(pins.brew.clone(), Polarity::ActiveLow),
        SwitchSensor::new(pins.steam.clone(), Polarity::ActiveLow),
        SsrHeater::new(pins.ssr.clone()),
        SimPump::default(),
        NoPressureTransducer,
    );
    (hw, pins)
}

#[test]
fn cold_boiler_energises_the_ssr() {
    let (mut hw, pins) = board();
    let mut service = MachineService::with_default_controllers();
    let mut display = HeadlessDisplay::new();
    let mut store = MockStore::default();
    let mut sink = RecordingSink::new();
    service.start(&store, &mut hw, &mut display, &mut sink);

    // SimProbe reads 0 C until something sets it: far below target.
    assert!(service.poll(101, &mut hw, &mut display, &mut store, &mut sink));
    assert!(pins.ssr.is_set_high());
    assert!(hw.heater.is_energized());
}

#[test]
fn closing_the_brew_switch_starts_a_shot() {
    let (mut hw, pins) = board();
    let mut service = MachineService::with_default_controllers();
    let mut display = HeadlessDisplay::new();
    let mut store = MockStore::default();
    let mut sink = RecordingSink::new();
    service.start(&store, &mut hw, &mut display, &mut sink);

    assert!(service.poll(101, &mut hw, &mut display, &mut store, &mut sink));
    assert_eq!(service.brew_phase(), BrewPhase::Idle);

    pins.brew.set(false);
    assert!(service.poll(202, &mut hw, &mut display, &mut store, &mut sink));
    assert_eq!(service.brew_phase(), BrewPhase::AutoPreinfusion);
    assert_eq!(hw.pump.desired_bar(), 2.0);
    assert_eq!(hw.pump.commands(), 2);

    pins.brew.set(true);
    assert!(service.poll(303, &mut hw, &mut display, &mut store, &mut sink));
    assert_eq!(service.brew_phase(), BrewPhase::Idle);
    assert_eq!(hw.pump.desired_bar(), 0.0);
}
