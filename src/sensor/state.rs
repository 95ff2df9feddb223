// src/sensor/state.rs

use crate::common::error::ReadError;
use core::convert::TryFrom;

/// Lifecycle state of a sensor session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorState {
    /// Fresh or reset session; flushes stale input on the next tick.
    ColdInit = 0,
    /// Waiting for the warm-up gate before serving requests.
    WarmingUp = 1,
    /// Ready to send the next request.
    Idle = 2,
    /// Request sent; collecting the response frame.
    AwaitingResponse = 3,
    /// A reading was just accepted. Lasts exactly one tick.
    ResponseReady = 4,
    /// The last cycle failed. Reported and cleared on the next tick.
    Error = 5,
}

impl SensorState {
    /// States in which a new request will be sent on the next tick
    /// (after the one-tick `ResponseReady` edge).
    #[inline]
    pub const fn is_ready(self) -> bool {
        matches!(self, SensorState::Idle | SensorState::ResponseReady)
    }
}

impl From<SensorState> for u8 {
    fn from(value: SensorState) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for SensorState {
    type Error = ReadError;

    fn try_from(value: u8) -> Result<Self, ReadError> {
        match value {
            0 => Ok(SensorState::ColdInit),
            1 => Ok(SensorState::WarmingUp),
            2 => Ok(SensorState::Idle),
            3 => Ok(SensorState::AwaitingResponse),
            4 => Ok(SensorState::ResponseReady),
            5 => Ok(SensorState::Error),
            _ => Err(ReadError::UndefinedState),
        }
    }
}
