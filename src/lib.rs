// src/lib.rs

//! Non-blocking driver for MH-Z14 style NDIR CO2 sensors on a serial port.
//!
//! The sensor answers a fixed 9-byte read command with a 9-byte frame carrying
//! the CO2 concentration and a temperature proxy. [`Mhz14`] runs that exchange
//! as a small state machine advanced by [`Mhz14::tick`], so a control loop is
//! never stalled waiting on the sensor. Completed reads are reported through a
//! [`ReadObserver`], or synchronously via [`Mhz14::read_and_wait`].
//!
//! ## Features
//!
//! - `impl-generic-hal`: [`common::hal_traits::DelayClock`] over `embedded-hal` delays.
//! - `log`: Enables logging using the `log` framework.
//! - `defmt`: Enables logging using the `defmt` framework.

#![cfg_attr(not(test), no_std)] // Specify no_std at the crate root
#![deny(unsafe_code)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// Must come first so the logging macros are visible to the modules below
mod fmt;

pub mod common;
pub mod sensor;

#[cfg(test)]
mod test_utils;

// Re-export key types for convenience
pub use common::{
    ConfigError, Mhz14Error, Mhz14Serial, Mhz14Timer, ReadError, Reading, SensorConfig,
    WarmupPolicy,
};
pub use sensor::{Mhz14, ReadObserver, SensorState};
