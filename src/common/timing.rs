// src/common/timing.rs

// All timestamps are `u32` milliseconds from `Mhz14Timer::now_ms`, which wraps
// after ~49.7 days. Differences are always taken with `wrapping_sub`, so a
// single wrap between two timestamps is harmless.

// === Serial link ===

/// Fixed bit rate of the sensor's UART (8N1).
pub const BAUD_RATE: u32 = 9600;

// === Read cycle ===

/// Time allowed for a response frame after the request was sent.
pub const READ_TIMEOUT_MS: u32 = 200;
/// Wall-clock budget for `read_and_wait`. Must exceed `READ_TIMEOUT_MS`.
pub const WAIT_BUDGET_MS: u32 = 1000;
/// Window in which every byte of a request frame must be accepted by the port.
pub const WRITE_TIMEOUT_MS: u32 = 20;

/// Longest the reader waits for the rest of a partially received frame in a single tick.
pub const INTER_BYTE_WAIT_US: u32 = 3000;
/// Step of the reader's inter-byte wait, about one byte time at 9600 baud.
pub const INTER_BYTE_STEP_US: u32 = 1000;
/// Pause between two ticks while blocking in `read_and_wait`.
pub const POLL_INTERVAL_US: u32 = 100;

// === Warm-up ===

/// Preheat time after power-up before readings are trusted (3 minutes).
pub const WARM_UP_MS: u32 = 3 * 60 * 1000;
/// Temperature proxy above which the sensor is considered warm.
pub const WARM_TEMPERATURE: u8 = 58;

// === Helpers ===

/// Milliseconds from `since` to `now`, tolerating one wrap of the clock.
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// `true` once at least `timeout_ms` milliseconds have passed since `since`.
#[inline]
pub const fn ms_timeout(now: u32, since: u32, timeout_ms: u32) -> bool {
    elapsed_ms(now, since) >= timeout_ms
}

/// `true` once at least `timeout_s` seconds have passed since `since`.
#[inline]
pub const fn sec_timeout(now: u32, since: u32, timeout_s: u32) -> bool {
    elapsed_ms(now, since) >= timeout_s.saturating_mul(1000)
}

/// `true` once at least `timeout_cs` centiseconds have passed since `since`.
#[inline]
pub const fn cs_timeout(now: u32, since: u32, timeout_cs: u32) -> bool {
    elapsed_ms(now, since) >= timeout_cs.saturating_mul(10)
}
