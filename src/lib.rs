//! Espresso machine control core.
//!
//! Exposes the pure-logic modules for integration testing and the
//! `espresso-sim` binary. Hardware is reached only through the port traits
//! in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod persistence;
pub mod scheduler;
pub mod sensors;
pub mod shared;
