//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements         | Connects to                      |
//! |--------------|--------------------|----------------------------------|
//! | `display`    | DisplayPort        | Headless settings/status page    |
//! | `eeprom`     | PersistencePort    | In-memory EEPROM image           |
//! | `hardware`   | HardwarePort       | Probe, switches, heater, pump    |
//! | `log_sink`   | EventSink          | Serial log output                |
//! | `simulation` | Temperature/Switch | Thermal model + phase dimmer     |
//! |              | Pump/PressurePort  |                                  |
//! | `time`       | ClockPort          | Monotonic or manual clock        |

pub mod display;
pub mod eeprom;
pub mod hardware;
pub mod log_sink;
pub mod simulation;
pub mod time;
