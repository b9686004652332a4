//! Application core — pure domain logic, zero I/O.
//!
//! Orchestrates one control cycle: temperature acquisition, boiler
//! regulation, the brew sequencer and the settings workflow. All interaction
//! with hardware, display and storage happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
