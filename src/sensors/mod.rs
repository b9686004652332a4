//! Sensor subsystem — temperature acquisition and front-panel switch drivers.
//!
//! The raw device reads live behind the port traits in
//! [`app::ports`](crate::app::ports); this module adds the acquisition
//! policy on top (fault acknowledgment, switch polarity, read-error
//! handling).

pub mod switch;
pub mod temperature;
