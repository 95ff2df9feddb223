// src/common/hal_traits.rs

use core::fmt::Debug;

/// Abstraction for the millisecond clock and short delays the driver needs.
pub trait Mhz14Timer {
    /// Monotonic milliseconds since an arbitrary epoch. May wrap; the driver
    /// only ever uses wrapping differences.
    fn now_ms(&self) -> u32;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);
}

/// Abstraction for the byte-oriented serial link to the sensor.
pub trait Mhz14Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Opens (or reconfigures) the port at `baud_rate`, 8N1.
    fn open(&mut self, baud_rate: u32) -> Result<(), Self::Error>;

    /// Number of received bytes waiting to be read.
    fn bytes_available(&mut self) -> usize;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;
}

/// [`Mhz14Timer`] built from an `embedded-hal` delay and a millisecond source.
///
/// ```ignore
/// let clock = DelayClock::new(delay, || monotonic_millis());
/// ```
#[cfg(feature = "impl-generic-hal")]
pub struct DelayClock<D, F> {
    delay: D,
    millis: F,
}

#[cfg(feature = "impl-generic-hal")]
impl<D, F> DelayClock<D, F>
where
    D: embedded_hal::delay::DelayNs,
    F: Fn() -> u32,
{
    pub fn new(delay: D, millis: F) -> Self {
        Self { delay, millis }
    }

    pub fn release(self) -> (D, F) {
        (self.delay, self.millis)
    }
}

#[cfg(feature = "impl-generic-hal")]
impl<D, F> Mhz14Timer for DelayClock<D, F>
where
    D: embedded_hal::delay::DelayNs,
    F: Fn() -> u32,
{
    fn now_ms(&self) -> u32 {
        (self.millis)()
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
