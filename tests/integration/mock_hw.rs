//! Mock adapters for integration tests.
//!
//! Record every actuator call and every `begin()` so tests can assert on the
//! full command history without touching real GPIO or a real EEPROM.

use espresso_core::app::events::AppEvent;
use espresso_core::app::ports::{
    ConfigPort, EventSink, HardwarePort, HeaterPort, PressurePort, PumpPort, SwitchPort,
    TemperaturePort,
};
use espresso_core::config::MachineConfig;
use espresso_core::error::{ConfigError, StorageError};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared log of `begin()` calls, in order.
pub type BeginLog = Rc<RefCell<Vec<&'static str>>>;

// ── Devices ───────────────────────────────────────────────────

pub struct MockProbe {
    pub celsius: f32,
    /// Fault the sensor keeps reporting until the test changes it.
    pub fault_code: u8,
    active: u8,
    pub clears: u32,
    log: BeginLog,
}

impl TemperaturePort for MockProbe {
    fn begin(&mut self) {
        self.log.borrow_mut().push("temperature");
    }

    fn read_celsius(&mut self) -> f32 {
        self.active = self.fault_code;
        self.celsius
    }

    fn sensor_fault_code(&mut self) -> u8 {
        self.active
    }

    fn clear_fault_code(&mut self) {
        self.active = 0;
        self.clears += 1;
    }
}

pub struct MockHeater {
    pub duties: Vec<u8>,
    log: BeginLog,
}

impl HeaterPort for MockHeater {
    fn begin(&mut self) {
        self.log.borrow_mut().push("heater");
    }

    fn set_duty(&mut self, duty: u8) {
        self.duties.push(duty);
    }
}

pub struct MockPump {
    pub commands: Vec<f32>,
    log: BeginLog,
}

impl PumpPort for MockPump {
    fn begin(&mut self) {
        self.log.borrow_mut().push("pump");
    }

    fn set_desired_pressure(&mut self, bar: f32) {
        self.commands.push(bar);
    }
}

pub struct MockSwitch {
    pub on: bool,
    name: &'static str,
    log: BeginLog,
}

impl SwitchPort for MockSwitch {
    fn begin(&mut self) {
        self.log.borrow_mut().push(self.name);
    }

    fn is_on(&mut self) -> bool {
        self.on
    }
}

pub struct MockPressure {
    log: BeginLog,
}

impl PressurePort for MockPressure {
    fn begin(&mut self) {
        self.log.borrow_mut().push("pressure");
    }

    fn read_bar(&mut self) -> Option<f32> {
        None
    }
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub probe: MockProbe,
    pub heater: MockHeater,
    pub pump: MockPump,
    pub brew: MockSwitch,
    pub steam: MockSwitch,
    pub pressure: MockPressure,
    pub begins: BeginLog,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(celsius: f32) -> Self {
        let begins: BeginLog = Rc::default();
        Self {
            probe: MockProbe {
                celsius,
                fault_code: 0,
                active: 0,
                clears: 0,
                log: Rc::clone(&begins),
            },
            heater: MockHeater {
                duties: Vec::new(),
                log: Rc::clone(&begins),
            },
            pump: MockPump {
                commands: Vec::new(),
                log: Rc::clone(&begins),
            },
            brew: MockSwitch {
                on: false,
                name: "brew_switch",
                log: Rc::clone(&begins),
            },
            steam: MockSwitch {
                on: false,
                name: "steam_switch",
                log: Rc::clone(&begins),
            },
            pressure: MockPressure {
                log: Rc::clone(&begins),
            },
            begins,
        }
    }

    pub fn last_duty(&self) -> Option<u8> {
        self.heater.duties.last().copied()
    }

    pub fn last_pump_bar(&self) -> Option<f32> {
        self.pump.commands.last().copied()
    }
}

impl HardwarePort for MockHardware {
    fn temperature(&mut self) -> &mut dyn TemperaturePort {
        &mut self.probe
    }

    fn heater(&mut self) -> &mut dyn HeaterPort {
        &mut self.heater
    }

    fn pump(&mut self) -> &mut dyn PumpPort {
        &mut self.pump
    }

    fn brew_switch(&mut self) -> &mut dyn SwitchPort {
        &mut self.brew
    }

    fn steam_switch(&mut self) -> &mut dyn SwitchPort {
        &mut self.steam
    }

    fn pressure(&mut self) -> &mut dyn PressurePort {
        &mut self.pressure
    }
}

// ── MockStore ─────────────────────────────────────────────────

/// Config store with scripted outcomes.
#[derive(Default)]
pub struct MockStore {
    pub stored: Option<MachineConfig>,
    pub fail_saves: bool,
    pub saves: Vec<MachineConfig>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn with(config: MachineConfig) -> Self {
        Self {
            stored: Some(config),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }
}

impl ConfigPort for MockStore {
    fn load(&self) -> Result<MachineConfig, ConfigError> {
        self.stored.ok_or(ConfigError::Corrupted {
            stored: 0xFFFF_FFFF,
            computed: 0,
        })
    }

    fn save(&mut self, config: &MachineConfig) -> Result<(), ConfigError> {
        if self.fail_saves {
            return Err(ConfigError::Storage(StorageError::WriteFailed));
        }
        self.saves.push(*config);
        self.stored = Some(*config);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
