//! Simulated machine for host builds.
//!
//! A first-order thermal model of the boiler, driven through the real
//! [`PhaseDimmer`] / [`ZeroCrossGate`] pair: every simulated mains
//! half-cycle the gate decides whether the element is on, exactly as the
//! zero-cross ISR does on the board. Switches are set by the caller, the
//! probe can be told to report fault codes, and the pump simply tracks its
//! commanded pressure.
//!
//! ```text
//!   dT/dt = (P_heater · fired − (k_loss + k_flow · pumping) · (T − T_ambient)) / C
//! ```

use log::debug;

use crate::adapters::hardware::HardwareAdapter;
use crate::app::ports::{PressurePort, PumpPort, SwitchPort, TemperaturePort};
use crate::drivers::dimmer::{PhaseDimmer, ZeroCrossGate, phase_dimmer};

/// 50 Hz mains: one zero crossing every 10 ms.
pub const HALF_CYCLE_MS: u64 = 10;

const PRESSURE_TIME_CONSTANT_S: f32 = 0.5;

// ═══════════════════════════════════════════════════════════════
//  Thermal model
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
pub struct BoilerModel {
    pub temp_c: f32,
    pub ambient_c: f32,
    pub heater_watts: f32,
    /// Heat capacity of water and boiler body (J/K)
    pub heat_capacity_j_per_k: f32,
    /// Losses to the room (W/K)
    pub loss_w_per_k: f32,
    /// Extra loss from cold water drawn in while the pump runs (W/K)
    pub flow_loss_w_per_k: f32,
}

impl Default for BoilerModel {
    fn default() -> Self {
        Self {
            temp_c: 22.0,
            ambient_c: 22.0,
            heater_watts: 1000.0,
            heat_capacity_j_per_k: 1500.0,
            loss_w_per_k: 1.2,
            flow_loss_w_per_k: 8.0,
        }
    }
}

impl BoilerModel {
    /// Integrate over `dt_secs` with the element on for `heat_fraction` of it.
    pub fn step(&mut self, heat_fraction: f32, pumping: bool, dt_secs: f32) {
        let k = self.loss_w_per_k + if pumping { self.flow_loss_w_per_k } else { 0.0 };
        let power = self.heater_watts * heat_fraction - k * (self.temp_c - self.ambient_c);
        self.temp_c += power / self.heat_capacity_j_per_k * dt_secs;
    }
}

// ═══════════════════════════════════════════════════════════════
//  Simulated devices
// ═══════════════════════════════════════════════════════════════

/// Temperature probe reading the model, with fault injection.
#[derive(Debug, Default)]
pub struct SimProbe {
    celsius: f32,
    fault_code: u8,
    active_fault: u8,
    faulted_reads: u32,
    clears: u32,
}

impl SimProbe {
    /// Report `code` for the next `reads` reads.
    pub fn inject_fault(&mut self, code: u8, reads: u32) {
        self.fault_code = code;
        self.faulted_reads = reads;
    }

    /// Times the fault code was acknowledged.
    pub fn clears(&self) -> u32 {
        self.clears
    }
}

impl TemperaturePort for SimProbe {
    fn begin(&mut self) {}

    fn read_celsius(&mut self) -> f32 {
        if self.faulted_reads > 0 {
            self.faulted_reads -= 1;
            self.active_fault = self.fault_code;
        }
        self.celsius
    }

    fn sensor_fault_code(&mut self) -> u8 {
        self.active_fault
    }

    fn clear_fault_code(&mut self) {
        self.active_fault = 0;
        self.clears += 1;
    }
}

#[derive(Debug, Default)]
pub struct SimSwitch {
    pub on: bool,
}

impl SwitchPort for SimSwitch {
    fn begin(&mut self) {}

    fn is_on(&mut self) -> bool {
        self.on
    }
}

#[derive(Debug, Default)]
pub struct SimPump {
    desired_bar: f32,
    commands: u64,
}

impl SimPump {
    pub fn desired_bar(&self) -> f32 {
        self.desired_bar
    }

    pub fn commands(&self) -> u64 {
        self.commands
    }
}

impl PumpPort for SimPump {
    fn begin(&mut self) {
        self.desired_bar = 0.0;
    }

    fn set_desired_pressure(&mut self, bar: f32) {
        self.desired_bar = bar;
        self.commands += 1;
    }
}

/// Transducer following the pump with a first-order lag.
#[derive(Debug, Default)]
pub struct SimPressure {
    bar: f32,
}

impl PressurePort for SimPressure {
    fn begin(&mut self) {}

    fn read_bar(&mut self) -> Option<f32> {
        Some(self.bar)
    }
}

pub type SimHardware =
    HardwareAdapter<SimProbe, SimSwitch, SimSwitch, PhaseDimmer, SimPump, SimPressure>;

// ═══════════════════════════════════════════════════════════════
//  Machine
// ═══════════════════════════════════════════════════════════════

pub struct SimulatedMachine {
    hw: SimHardware,
    gate: ZeroCrossGate,
    model: BoilerModel,
    carry_ms: u64,
    fired_half_cycles: u64,
}

impl SimulatedMachine {
    pub fn new(model: BoilerModel) -> Self {
        let (dimmer, gate) = phase_dimmer();
        let mut hw = HardwareAdapter::new(
            SimProbe::default(),
            SimSwitch::default(),
            SimSwitch::default(),
            dimmer,
            SimPump::default(),
            SimPressure::default(),
        );
        hw.temperature.celsius = model.temp_c;
        Self {
            hw,
            gate,
            model,
            carry_ms: 0,
            fired_half_cycles: 0,
        }
    }

    pub fn hardware_mut(&mut self) -> &mut SimHardware {
        &mut self.hw
    }

    pub fn hardware(&self) -> &SimHardware {
        &self.hw
    }

    pub fn set_brew_switch(&mut self, on: bool) {
        debug!("SIM: brew switch {}", if on { "ON" } else { "OFF" });
        self.hw.brew_switch.on = on;
    }

    pub fn set_steam_switch(&mut self, on: bool) {
        debug!("SIM: steam switch {}", if on { "ON" } else { "OFF" });
        self.hw.steam_switch.on = on;
    }

    pub fn inject_sensor_fault(&mut self, code: u8, reads: u32) {
        self.hw.temperature.inject_fault(code, reads);
    }

    pub fn boiler_temp_c(&self) -> f32 {
        self.model.temp_c
    }

    pub fn line_pressure_bar(&self) -> f32 {
        self.hw.pressure.bar
    }

    /// Half-cycles in which the triac fired since construction.
    pub fn fired_half_cycles(&self) -> u64 {
        self.fired_half_cycles
    }

    /// Advance simulated time by `dt_ms`.
    pub fn advance(&mut self, dt_ms: u64) {
        let dt_s = HALF_CYCLE_MS as f32 / 1000.0;
        self.carry_ms += dt_ms;
        while self.carry_ms >= HALF_CYCLE_MS {
            self.carry_ms -= HALF_CYCLE_MS;

            let fired = self.gate.on_zero_cross();
            if fired {
                self.fired_half_cycles += 1;
            }
            let desired = self.hw.pump.desired_bar;
            self.model
                .step(if fired { 1.0 } else { 0.0 }, desired > 0.0, dt_s);

            let p = &mut self.hw.pressure.bar;
            *p += (desired - *p) * (dt_s / PRESSURE_TIME_CONSTANT_S);
        }
        self.hw.temperature.celsius = self.model.temp_c;
    }
}

impl Default for SimulatedMachine {
    fn default() -> Self {
        Self::new(BoilerModel::default())
    }
}
