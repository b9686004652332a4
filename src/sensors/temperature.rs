//! Boiler temperature acquisition.
//!
//! Wraps a [`TemperaturePort`] read with fault-code capture. A non-zero
//! fault code is acknowledged on the sensor in the same call that observed
//! it, so a transient fault (open thermocouple blip, SPI glitch) never blocks
//! the following reads.
//!
//! The last fault-free reading is remembered separately; a faulted sample
//! never overwrites it.

use log::{info, warn};

use crate::app::ports::TemperaturePort;

/// Fault code reported by a healthy sensor.
pub const NO_FAULT: u8 = 0;

/// One acquisition result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSample {
    pub celsius: f32,
    pub fault_code: u8,
}

impl TemperatureSample {
    pub fn is_faulted(&self) -> bool {
        self.fault_code != NO_FAULT
    }
}

pub struct TemperatureAcquisition {
    last_valid_c: Option<f32>,
    last_fault: u8,
}

impl TemperatureAcquisition {
    pub fn new() -> Self {
        Self {
            last_valid_c: None,
            last_fault: NO_FAULT,
        }
    }

    /// Read the sensor once. Never fails; problems are reported through
    /// [`TemperatureSample::fault_code`].
    pub fn sample<S: TemperaturePort + ?Sized>(&mut self, sensor: &mut S) -> TemperatureSample {
        let celsius = sensor.read_celsius();
        let fault_code = sensor.sensor_fault_code();

        if fault_code == NO_FAULT {
            if self.last_fault != NO_FAULT {
                info!("TEMP: sensor fault cleared, reading {:.1} C", celsius);
            }
            self.last_valid_c = Some(celsius);
        } else {
            sensor.clear_fault_code();
            if fault_code != self.last_fault {
                warn!("TEMP: sensor fault code {} (acknowledged)", fault_code);
            }
        }
        self.last_fault = fault_code;

        TemperatureSample {
            celsius,
            fault_code,
        }
    }

    /// Most recent fault-free reading, if any.
    pub fn last_valid_celsius(&self) -> Option<f32> {
        self.last_valid_c
    }

    pub fn last_fault_code(&self) -> u8 {
        self.last_fault
    }
}

impl Default for TemperatureAcquisition {
    fn default() -> Self {
        Self::new()
    }
}
