// src/common/config.rs

use super::error::ConfigError;
use super::timing;

/// How the warm-up gate is enforced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WarmupPolicy {
    /// No gate. Every valid frame is accepted from the start.
    Disabled,
    /// Requests are served, but valid frames are rejected with
    /// `NotWarmedUp` until the gate opens.
    #[default]
    GateReadings,
    /// Requests are held in the warming-up state until the gate opens.
    HoldRequests,
}

/// Device number and timing thresholds for one sensor.
///
/// Defaults match the MH-Z14 datasheet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Sensor number placed in byte 1 of the request.
    pub device_number: u8,
    /// Serial bit rate used by `begin`.
    pub baud_rate: u32,
    pub warmup: WarmupPolicy,
    /// The gate opens once this much time has passed since `begin`.
    pub warmup_ms: u32,
    /// The gate opens once a frame reports a temperature proxy above this.
    pub warm_temperature: u8,
    pub read_timeout_ms: u32,
    /// Wall-clock budget of the blocking read.
    pub wait_budget_ms: u32,
    /// Maximum bytes discarded by a receive-buffer flush.
    pub flush_limit: u8,
    /// Consecutive failed cycles before the receive buffer is flushed.
    pub error_flush_threshold: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device_number: 1,
            baud_rate: timing::BAUD_RATE,
            warmup: WarmupPolicy::GateReadings,
            warmup_ms: timing::WARM_UP_MS,
            warm_temperature: timing::WARM_TEMPERATURE,
            read_timeout_ms: timing::READ_TIMEOUT_MS,
            wait_budget_ms: timing::WAIT_BUDGET_MS,
            flush_limit: 32,
            error_flush_threshold: 1,
        }
    }
}

impl SensorConfig {
    pub fn with_device_number(mut self, device_number: u8) -> Self {
        self.device_number = device_number;
        self
    }

    pub fn with_warmup(mut self, warmup: WarmupPolicy) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_warmup_ms(mut self, warmup_ms: u32) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }

    pub fn with_warm_temperature(mut self, warm_temperature: u8) -> Self {
        self.warm_temperature = warm_temperature;
        self
    }

    pub fn with_read_timeout_ms(mut self, read_timeout_ms: u32) -> Self {
        self.read_timeout_ms = read_timeout_ms;
        self
    }

    pub fn with_wait_budget_ms(mut self, wait_budget_ms: u32) -> Self {
        self.wait_budget_ms = wait_budget_ms;
        self
    }

    pub fn with_flush_limit(mut self, flush_limit: u8) -> Self {
        self.flush_limit = flush_limit;
        self
    }

    pub fn with_error_flush_threshold(mut self, threshold: u8) -> Self {
        self.error_flush_threshold = threshold;
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Checks the relations between the thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ZeroReadTimeout);
        }
        if self.wait_budget_ms <= self.read_timeout_ms {
            return Err(ConfigError::WaitBudgetTooShort {
                budget_ms: self.wait_budget_ms,
                read_timeout_ms: self.read_timeout_ms,
            });
        }
        if self.error_flush_threshold == 0 {
            return Err(ConfigError::ZeroFlushThreshold);
        }
        Ok(())
    }
}
