//! Solid-state relay heater driver.
//!
//! ## Hardware
//!
//! Zero-crossing SSR switched by a GPIO. The relay is either on or off, so
//! only a full duty (255) energises the element; any lower duty keeps it
//! off.
//!
//! A pin write error leaves the relay state unknown. It is logged and
//! counted; the next cycle writes again.

use embedded_hal::digital::OutputPin;
use log::{debug, error};

use crate::app::ports::HeaterPort;

pub struct SsrHeater<P> {
    pin: P,
    energized: bool,
    write_errors: u32,
}

impl<P: OutputPin> SsrHeater<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            energized: false,
            write_errors: 0,
        }
    }

    /// Last level successfully written.
    pub fn is_energized(&self) -> bool {
        self.energized
    }

    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    pub fn release(self) -> P {
        self.pin
    }

    fn drive(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => {
                if on != self.energized {
                    debug!("SSR: {}", if on { "on" } else { "off" });
                }
                self.energized = on;
            }
            Err(e) => {
                self.write_errors = self.write_errors.saturating_add(1);
                error!("SSR: pin write failed ({:?}), heater state unknown", e);
            }
        }
    }
}

impl<P: OutputPin> HeaterPort for SsrHeater<P> {
    fn begin(&mut self) {
        self.drive(false);
    }

    fn set_duty(&mut self, duty: u8) {
        self.drive(duty == u8::MAX);
    }
}
