// src/sensor/observer.rs

use crate::common::error::ReadError;

/// Receives the outcome of every completed read request.
///
/// Called exactly once per request: with the fresh reading and `None` on
/// success, or with `(0, 0, Some(error))` on failure. Any
/// `FnMut(u16, u8, Option<ReadError>)` closure is an observer.
pub trait ReadObserver {
    fn on_read_complete(&mut self, value: u16, temperature: u8, error: Option<ReadError>);
}

impl<F> ReadObserver for F
where
    F: FnMut(u16, u8, Option<ReadError>),
{
    fn on_read_complete(&mut self, value: u16, temperature: u8, error: Option<ReadError>) {
        self(value, temperature, error)
    }
}

/// Observer type of a session built without a callback.
pub type ReadCallback = fn(u16, u8, Option<ReadError>);
