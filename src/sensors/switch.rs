//! Front-panel switch driver (brew / steam).
//!
//! ## Hardware
//!
//! Latching rocker switch on a GPIO with pull-up or pull-down, so the
//! active level depends on wiring. A read error is treated as OFF: an
//! unreadable brew switch must never start the pump, and an unreadable
//! steam switch keeps the boiler at the lower brew setpoint.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::app::ports::SwitchPort;

/// Electrical level that means "switch on".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

pub struct SwitchSensor<P> {
    pin: P,
    polarity: Polarity,
    read_errors: u32,
}

impl<P: InputPin> SwitchSensor<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self {
            pin,
            polarity,
            read_errors: 0,
        }
    }

    /// Failed pin reads since construction.
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> SwitchPort for SwitchSensor<P> {
    fn begin(&mut self) {
        debug!("Switch: ready ({:?})", self.polarity);
    }

    fn is_on(&mut self) -> bool {
        let level = match self.polarity {
            Polarity::ActiveHigh => self.pin.is_high(),
            Polarity::ActiveLow => self.pin.is_low(),
        };
        match level {
            Ok(on) => on,
            Err(e) => {
                if self.read_errors == 0 {
                    warn!("Switch: pin read failed ({:?}), treating as OFF", e);
                }
                self.read_errors = self.read_errors.saturating_add(1);
                false
            }
        }
    }
}
