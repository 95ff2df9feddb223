// src/sensor/io_helpers.rs

use super::{Mhz14, ReadObserver};
use crate::common::{
    error::Mhz14Error,
    frame::{encode_request, FRAME_LEN},
    hal_traits::{Mhz14Serial, Mhz14Timer},
    timing,
};
use nb::Result as NbResult;

/// Result of one look at the receive buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum FramePoll {
    /// Not a full frame yet. `partial` if some of it has arrived.
    Pending { partial: bool },
    /// A full frame was read.
    Complete([u8; FRAME_LEN]),
    /// A partial frame stalled past the read timeout. Its bytes were discarded.
    TimedOut { received: usize },
}

// Implementation block for I/O related helpers
impl<S, T, C> Mhz14<S, T, C>
where
    S: Mhz14Serial,
    T: Mhz14Timer,
    C: ReadObserver,
{
    /// Sends the read request frame.
    pub(super) fn send_request(&mut self) -> Result<(), Mhz14Error<S::Error>> {
        let frame = encode_request(self.config.device_number);
        trace!("request {:?}", frame);

        for byte in frame {
            self.execute_blocking_io_with_timeout(timing::WRITE_TIMEOUT_MS, |serial| {
                serial.write_byte(byte)
            })?;
        }
        Ok(())
    }

    /// Takes a full frame off the port if one is there.
    ///
    /// Bytes stay in the port until all nine have arrived. A partial frame
    /// gets a short bounded wait for the rest, then is left for the next tick;
    /// if it is still incomplete `read_timeout_ms` after it was first seen,
    /// its bytes are dropped.
    pub(super) fn poll_frame(&mut self, now: u32) -> Result<FramePoll, Mhz14Error<S::Error>> {
        let mut available = self.serial.bytes_available();
        if available == 0 && self.partial_since.is_none() {
            return Ok(FramePoll::Pending { partial: false });
        }

        let mut waited_us = 0;
        while available > 0 && available < FRAME_LEN && waited_us < timing::INTER_BYTE_WAIT_US {
            self.timer.delay_us(timing::INTER_BYTE_STEP_US);
            waited_us += timing::INTER_BYTE_STEP_US;
            available = self.serial.bytes_available();
        }

        if available >= FRAME_LEN {
            self.partial_since = None;
            let mut frame = [0u8; FRAME_LEN];
            for (received, slot) in frame.iter_mut().enumerate() {
                match self.serial.read_byte() {
                    Ok(byte) => *slot = byte,
                    // Port reported more bytes than it could deliver
                    Err(nb::Error::WouldBlock) => return Ok(FramePoll::TimedOut { received }),
                    Err(nb::Error::Other(e)) => return Err(Mhz14Error::Io(e)),
                }
            }
            trace!("response {:?}", frame);
            return Ok(FramePoll::Complete(frame));
        }

        let since = *self.partial_since.get_or_insert(now);
        if timing::ms_timeout(now, since, self.config.read_timeout_ms) {
            self.partial_since = None;
            let received = self.flush_input(available);
            return Ok(FramePoll::TimedOut { received });
        }
        Ok(FramePoll::Pending { partial: true })
    }

    /// Reads and drops up to `limit` buffered bytes. Returns how many were dropped.
    pub(super) fn flush_input(&mut self, limit: usize) -> usize {
        let mut flushed = 0;
        while flushed < limit && self.serial.bytes_available() > 0 {
            match self.serial.read_byte() {
                Ok(_) => flushed += 1,
                Err(_) => break,
            }
        }
        flushed
    }

    /// Executes a non-blocking I/O operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a write timeout error.
    pub(super) fn execute_blocking_io_with_timeout<FN, R>(
        &mut self,
        timeout_ms: u32,
        mut f: FN,
    ) -> Result<R, Mhz14Error<S::Error>>
    where
        FN: FnMut(&mut S) -> NbResult<R, S::Error>,
    {
        let start = self.timer.now_ms();

        loop {
            match f(&mut self.serial) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if timing::ms_timeout(self.timer.now_ms(), start, timeout_ms) {
                        return Err(Mhz14Error::WriteTimeout { budget_ms: timeout_ms });
                    }
                    self.timer.delay_us(100);
                }
                Err(nb::Error::Other(e)) => return Err(Mhz14Error::Io(e)),
            }
        }
    }
}
