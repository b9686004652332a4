//! Hardware adapter — bridges concrete drivers to the domain's
//! [`HardwarePort`].
//!
//! Owns one driver per device and hands each out as a port trait object.
//! Generic over every driver so the same composition serves the real board
//! (GPIO-backed [`SwitchSensor`](crate::sensors::switch::SwitchSensor),
//! [`SsrHeater`](crate::drivers::heater::SsrHeater) or
//! [`PhaseDimmer`](crate::drivers::dimmer::PhaseDimmer)) and the
//! simulator.

use crate::app::ports::{
    HardwarePort, HeaterPort, PressurePort, PumpPort, SwitchPort, TemperaturePort,
};

/// Concrete adapter that combines all devices behind [`HardwarePort`].
pub struct HardwareAdapter<T, BS, SS, H, P, R> {
    pub temperature: T,
    pub brew_switch: BS,
    pub steam_switch: SS,
    pub heater: H,
    pub pump: P,
    pub pressure: R,
}

impl<T, BS, SS, H, P, R> HardwareAdapter<T, BS, SS, H, P, R>
where
    T: TemperaturePort,
    BS: SwitchPort,
    SS: SwitchPort,
    H: HeaterPort,
    P: PumpPort,
    R: PressurePort,
{
    pub fn new(
        temperature: T,
        brew_switch: BS,
        steam_switch: SS,
        heater: H,
        pump: P,
        pressure: R,
    ) -> Self {
        Self {
            temperature,
            brew_switch,
            steam_switch,
            heater,
            pump,
            pressure,
        }
    }
}

impl<T, BS, SS, H, P, R> HardwarePort for HardwareAdapter<T, BS, SS, H, P, R>
where
    T: TemperaturePort,
    BS: SwitchPort,
    SS: SwitchPort,
    H: HeaterPort,
    P: PumpPort,
    R: PressurePort,
{
    fn temperature(&mut self) -> &mut dyn TemperaturePort {
        &mut self.temperature
    }

    fn heater(&mut self) -> &mut dyn HeaterPort {
        &mut self.heater
    }

    fn pump(&mut self) -> &mut dyn PumpPort {
        &mut self.pump
    }

    fn brew_switch(&mut self) -> &mut dyn SwitchPort {
        &mut self.brew_switch
    }

    fn steam_switch(&mut self) -> &mut dyn SwitchPort {
        &mut self.steam_switch
    }

    fn pressure(&mut self) -> &mut dyn PressurePort {
        &mut self.pressure
    }
}

/// Stand-in for machines built without a pressure transducer.
#[derive(Debug, Default)]
pub struct NoPressureTransducer;

impl PressurePort for NoPressureTransducer {
    fn begin(&mut self) {}

    fn read_bar(&mut self) -> Option<f32> {
        None
    }
}
