//! Heater actuator drivers.
//!
//! | Driver         | Actuation    | Duty semantics                  |
//! |----------------|--------------|---------------------------------|
//! | `SsrHeater`    | SSR on a GPIO| binary: 255 = on, else off      |
//! | `PhaseDimmer`  | triac + ZCD  | proportional: duty/255 of cycles|

pub mod dimmer;
pub mod heater;
