// src/common/frame.rs

//! Encoding and decoding of the fixed 9-byte sensor frames.
//!
//! Request: `[0xFF][device][0x86][0][0][0][0][0][check]`
//!
//! Response: `[0xFF][0x86][co2 hi][co2 lo][temp][_][_][_][check]`
//!
//! The check byte is the two's-complement negation of the wrapping sum of the
//! first eight bytes.

use super::error::ReadError;

/// Length of every request and response frame.
pub const FRAME_LEN: usize = 9;

/// First byte of every frame.
pub const START_BYTE: u8 = 0xFF;

/// "Read gas concentration" command.
pub const READ_CMD: u8 = 0x86;

/// A validated measurement taken from a response frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Gas concentration (ppm for CO2 variants).
    pub concentration: u16,
    /// Raw temperature proxy byte. Undocumented by the vendor; tracks the
    /// sensor's internal temperature.
    pub temperature: u8,
}

/// Codec level failures.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Buffer is not exactly one frame long.
    #[error("frame length {got}, expected 9")]
    Length { got: usize },

    /// Received check byte does not match the calculated one.
    #[error("checksum mismatch: received {received:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { received: u8, calculated: u8 },
}

impl From<FrameError> for ReadError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Length { .. } => ReadError::MissingData,
            FrameError::ChecksumMismatch { .. } => ReadError::ChecksumFailed,
        }
    }
}

/// Calculates the check byte over `data` (normally the first 8 frame bytes).
#[inline]
pub fn checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    sum.wrapping_neg()
}

/// Builds the read request for the sensor at `device_number`.
pub fn encode_request(device_number: u8) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = START_BYTE;
    frame[1] = device_number;
    frame[2] = READ_CMD;
    frame[FRAME_LEN - 1] = checksum(&frame[..FRAME_LEN - 1]);
    frame
}

/// Checks a complete frame's check byte.
pub fn verify_frame(frame: &[u8; FRAME_LEN]) -> Result<(), FrameError> {
    let calculated = checksum(&frame[..FRAME_LEN - 1]);
    let received = frame[FRAME_LEN - 1];
    if calculated == received {
        Ok(())
    } else {
        Err(FrameError::ChecksumMismatch { received, calculated })
    }
}

/// Parses a response frame into a [`Reading`].
///
/// Header and command echo (bytes 0-1) are not validated; only the length and
/// check byte are.
pub fn parse_response(bytes: &[u8]) -> Result<Reading, FrameError> {
    let frame: &[u8; FRAME_LEN] = bytes
        .try_into()
        .map_err(|_| FrameError::Length { got: bytes.len() })?;

    verify_frame(frame)?;

    Ok(Reading {
        concentration: u16::from_be_bytes([frame[2], frame[3]]),
        temperature: frame[4],
    })
}
