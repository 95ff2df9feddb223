// src/sensor/mod.rs

// The session is split across files the same way its work is:
// public API here, the tick in state_machine.rs, byte I/O in io_helpers.rs
// and the blocking facade in blocking.rs.
mod blocking;
mod io_helpers;
pub mod observer;
pub mod state;
mod state_machine;

pub use observer::{ReadCallback, ReadObserver};
pub use state::SensorState;

use crate::common::{
    config::{SensorConfig, WarmupPolicy},
    error::{ConfigError, Mhz14Error, ReadError},
    frame::Reading,
    hal_traits::{Mhz14Serial, Mhz14Timer},
};

/// One MH-Z14 sensor on a serial port.
///
/// Owns the port and clock and runs one request/response exchange at a time.
/// Call [`tick`](Self::tick) on every control-loop iteration; each call makes
/// at most one state transition and returns without waiting on the sensor.
///
/// ```ignore
/// let mut sensor = Mhz14::new(uart, clock, SensorConfig::default())?
///     .with_callback(|ppm: u16, _temp: u8, err: Option<ReadError>| { /* ... */ });
/// sensor.begin()?;
/// loop {
///     sensor.request_read();
///     sensor.tick().ok();
/// }
/// ```
pub struct Mhz14<S, T, C = ReadCallback> {
    serial: S,
    timer: T,
    config: SensorConfig,
    callback: Option<C>,

    state: SensorState,
    pending_request: bool,
    request_sent_at: u32,
    warmup_started_at: u32,
    warmup_satisfied: bool,
    last_reading: Option<Reading>,
    last_error: Option<ReadError>,
    consecutive_errors: u8,
    // First time a partial frame was seen in the current exchange
    partial_since: Option<u32>,
}

impl<S, T> Mhz14<S, T>
where
    S: Mhz14Serial,
    T: Mhz14Timer,
{
    /// Creates a session without a callback. The port is not touched until
    /// [`begin`](Self::begin).
    pub fn new(serial: S, timer: T, config: SensorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let now = timer.now_ms();
        Ok(Mhz14 {
            serial,
            timer,
            config,
            callback: None,
            state: SensorState::ColdInit,
            pending_request: false,
            request_sent_at: now,
            warmup_started_at: now,
            warmup_satisfied: config.warmup == WarmupPolicy::Disabled,
            last_reading: None,
            last_error: None,
            consecutive_errors: 0,
            partial_since: None,
        })
    }
}

impl<S, T, C> Mhz14<S, T, C>
where
    S: Mhz14Serial,
    T: Mhz14Timer,
    C: ReadObserver,
{
    /// Replaces the observer, changing its type (e.g. to a capturing closure).
    pub fn with_callback<C2: ReadObserver>(self, callback: C2) -> Mhz14<S, T, C2> {
        Mhz14 {
            serial: self.serial,
            timer: self.timer,
            config: self.config,
            callback: Some(callback),
            state: self.state,
            pending_request: self.pending_request,
            request_sent_at: self.request_sent_at,
            warmup_started_at: self.warmup_started_at,
            warmup_satisfied: self.warmup_satisfied,
            last_reading: self.last_reading,
            last_error: self.last_error,
            consecutive_errors: self.consecutive_errors,
            partial_since: self.partial_since,
        }
    }

    /// Registers the completion observer.
    pub fn set_callback(&mut self, callback: C) {
        self.callback = Some(callback);
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// Opens the port at the sensor's bit rate and restarts the session,
    /// including the warm-up timer. The last reading is kept.
    pub fn begin(&mut self) -> Result<(), Mhz14Error<S::Error>> {
        self.serial
            .open(self.config.baud_rate)
            .map_err(Mhz14Error::Io)?;

        self.warmup_started_at = self.timer.now_ms();
        self.warmup_satisfied = self.config.warmup == WarmupPolicy::Disabled;
        self.pending_request = false;
        self.last_error = None;
        self.consecutive_errors = 0;
        self.partial_since = None;
        self.state = SensorState::ColdInit;
        debug!("begin: device {}, {} baud", self.config.device_number, self.config.baud_rate);
        Ok(())
    }

    /// Asks for a reading. Returns `false` if the session is ready to send it
    /// right away, `true` if it is busy; the request is recorded either way
    /// and sent once the session is idle.
    pub fn request_read(&mut self) -> bool {
        self.pending_request = true;
        !self.state.is_ready()
    }

    /// Clears the error state and returns to cold-init. Warm-up progress is kept.
    pub fn reset_error(&mut self) {
        self.state = SensorState::ColdInit;
        self.last_error = None;
        self.consecutive_errors = 0;
        self.partial_since = None;
    }

    pub fn status(&self) -> SensorState {
        self.state
    }

    /// Last accepted concentration, `0` before the first one.
    pub fn last_value(&self) -> u16 {
        self.last_reading.map_or(0, |r| r.concentration)
    }

    /// Last accepted temperature proxy, `0` before the first one.
    pub fn last_temperature(&self) -> u8 {
        self.last_reading.map_or(0, |r| r.temperature)
    }

    pub fn last_reading(&self) -> Option<Reading> {
        self.last_reading
    }

    /// Classification of the most recent failed cycle, cleared by a success.
    pub fn last_error(&self) -> Option<ReadError> {
        self.last_error
    }

    pub fn consecutive_errors(&self) -> u8 {
        self.consecutive_errors
    }

    pub fn warmup_satisfied(&self) -> bool {
        self.warmup_satisfied
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Gives back the port and clock.
    pub fn release(self) -> (S, T) {
        (self.serial, self.timer)
    }
}
