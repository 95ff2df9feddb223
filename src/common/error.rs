// src/common/error.rs

use core::fmt::Debug;

/// Outcome classification of a failed read cycle.
///
/// Every variant is local to one request/response exchange; the session
/// always returns to idle afterwards and the next request retries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// No byte arrived before the read timeout elapsed.
    #[error("sensor did not answer")]
    NoAnswer,

    /// A full frame arrived but its check byte does not match.
    #[error("frame checksum failed")]
    ChecksumFailed,

    /// Some bytes arrived, but not a full frame, before the read timeout.
    #[error("incomplete frame received")]
    MissingData,

    /// The frame was valid but the sensor has not finished warming up.
    #[error("sensor not warmed up")]
    NotWarmedUp,

    /// A lifecycle state outside the known set was observed.
    #[error("undefined sensor state")]
    UndefinedState,

    /// The serial port reported a fault during the exchange.
    #[error("serial transport fault")]
    Transport,
}

impl ReadError {
    /// The one-byte code reported to observers for this error.
    pub const fn code(self) -> u8 {
        match self {
            ReadError::NoAnswer => 0xFF,
            ReadError::ChecksumFailed => 0xFE,
            ReadError::MissingData => 0xFD,
            ReadError::NotWarmedUp => 0xFC,
            ReadError::UndefinedState => 0xFB,
            ReadError::Transport => 0xFA,
        }
    }

    /// Inverse of [`ReadError::code`]. Returns `None` for 0 (success) and unknown codes.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0xFF => Some(ReadError::NoAnswer),
            0xFE => Some(ReadError::ChecksumFailed),
            0xFD => Some(ReadError::MissingData),
            0xFC => Some(ReadError::NotWarmedUp),
            0xFB => Some(ReadError::UndefinedState),
            0xFA => Some(ReadError::Transport),
            _ => None,
        }
    }
}

/// Flattens a read outcome into its code, `0` meaning success.
pub const fn error_code(error: Option<ReadError>) -> u8 {
    match error {
        Some(e) => e.code(),
        None => 0,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Mhz14Error<E = ()>
where
    E: Debug, // Need Debug for the generic Io error
{
    /// Underlying I/O error from the serial implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The read cycle completed with an error.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// The blocking read budget ran out before a reading was ready.
    #[error("no reading within {budget_ms} ms")]
    Timeout { budget_ms: u32 },

    /// The port kept refusing a request byte for the whole write window.
    #[error("write blocked for {budget_ms} ms")]
    WriteTimeout { budget_ms: u32 },
}

impl<E: Debug> Mhz14Error<E> {
    /// The read-cycle classification this error corresponds to.
    pub fn read_error(&self) -> ReadError {
        match self {
            Mhz14Error::Io(_) => ReadError::Transport,
            Mhz14Error::Read(e) => *e,
            Mhz14Error::Timeout { .. } => ReadError::NoAnswer,
            Mhz14Error::WriteTimeout { .. } => ReadError::Transport,
        }
    }
}

/// Configuration rejected by [`SensorConfig::validate`](super::SensorConfig::validate).
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("read timeout must be non-zero")]
    ZeroReadTimeout,

    #[error("wait budget {budget_ms} ms must exceed the read timeout of {read_timeout_ms} ms")]
    WaitBudgetTooShort { budget_ms: u32, read_timeout_ms: u32 },

    #[error("error flush threshold must be at least 1")]
    ZeroFlushThreshold,

    #[error("baud rate must be non-zero")]
    ZeroBaudRate,
}
