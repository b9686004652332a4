//! Boiler control — mode selection plus the reference delegate controllers.

pub mod pid;
pub mod regulator;
pub mod steam;
