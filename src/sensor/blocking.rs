// src/sensor/blocking.rs

use super::{Mhz14, ReadObserver, SensorState};
use crate::common::{
    error::{Mhz14Error, ReadError},
    frame::Reading,
    hal_traits::{Mhz14Serial, Mhz14Timer},
    timing,
};

impl<S, T, C> Mhz14<S, T, C>
where
    S: Mhz14Serial,
    T: Mhz14Timer,
    C: ReadObserver,
{
    /// Takes one reading, blocking for at most `wait_budget_ms`.
    ///
    /// Resets any error, requests a read and ticks the session until the
    /// reading is ready. A failed cycle is settled (observer called, session
    /// back to idle) and returned right away rather than waiting out the budget.
    pub fn try_read_and_wait(&mut self) -> Result<Reading, Mhz14Error<S::Error>> {
        let budget_ms = self.config.wait_budget_ms;
        let start = self.timer.now_ms();
        self.reset_error();
        self.request_read();

        loop {
            if let Err(e) = self.tick() {
                self.tick()?;
                return Err(e);
            }

            match self.state {
                SensorState::ResponseReady => {
                    return self
                        .last_reading
                        .ok_or(Mhz14Error::Read(ReadError::UndefinedState));
                }
                SensorState::Error => {
                    let error = self.last_error.unwrap_or(ReadError::UndefinedState);
                    self.tick()?;
                    return Err(Mhz14Error::Read(error));
                }
                _ => {}
            }

            if timing::ms_timeout(self.timer.now_ms(), start, budget_ms) {
                debug!("no reading within {} ms", budget_ms);
                return Err(Mhz14Error::Timeout { budget_ms });
            }
            self.timer.delay_us(timing::POLL_INTERVAL_US);
        }
    }

    /// Blocking read returning the concentration, or `0` on any failure.
    pub fn read_and_wait(&mut self) -> u16 {
        self.try_read_and_wait().map_or(0, |r| r.concentration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{SensorConfig, WarmupPolicy};
    use crate::test_utils::{response_frame, MockSerial, MockTimer};
    use core::cell::Cell;

    fn started(config: SensorConfig) -> (Mhz14<MockSerial, MockTimer>, MockSerial, MockTimer) {
        let serial = MockSerial::new();
        let timer = MockTimer::new();
        let mut sensor = Mhz14::new(serial.clone(), timer.clone(), config).unwrap();
        sensor.begin().unwrap();
        (sensor, serial, timer)
    }

    #[test]
    fn test_read_and_wait_success() {
        let (mut sensor, serial, _timer) = started(SensorConfig::default().with_warmup_ms(0));
        serial.set_auto_reply(Some(response_frame(1500, 45)));

        assert_eq!(sensor.read_and_wait(), 1500);
        assert_eq!(sensor.status(), SensorState::ResponseReady);
        assert_eq!(sensor.last_temperature(), 45);
        assert_eq!(serial.frames_sent(), 1);
    }

    #[test]
    fn test_read_and_wait_ignores_stale_bytes() {
        let (mut sensor, serial, _timer) = started(SensorConfig::default().with_warmup_ms(0));
        serial.stage_read_data(&[0x11, 0x22, 0x33]);
        serial.set_auto_reply(Some(response_frame(777, 30)));

        assert_eq!(sensor.read_and_wait(), 777);
    }

    #[test]
    fn test_try_read_and_wait_no_answer() {
        let (sensor, _serial, timer) = started(SensorConfig::default().with_warmup_ms(0));
        let fired = Cell::new(0u32);
        let mut sensor = sensor.with_callback(|value: u16, temperature: u8, error: Option<ReadError>| {
            assert_eq!((value, temperature, error), (0, 0, Some(ReadError::NoAnswer)));
            fired.set(fired.get() + 1);
        });

        let result = sensor.try_read_and_wait();
        assert!(matches!(result, Err(Mhz14Error::Read(ReadError::NoAnswer))));
        // Settled: observer told once, session idle again
        assert_eq!(fired.get(), 1);
        assert_eq!(sensor.status(), SensorState::Idle);
        let elapsed_ms = timer.now_us() / 1000;
        assert!((200..1000).contains(&elapsed_ms));
    }

    #[test]
    fn test_read_and_wait_not_warm_returns_zero() {
        let (mut sensor, serial, _timer) = started(SensorConfig::default());
        serial.set_auto_reply(Some(response_frame(900, 30)));

        assert_eq!(sensor.read_and_wait(), 0);
        assert_eq!(sensor.last_error(), Some(ReadError::NotWarmedUp));
        assert_eq!(sensor.status(), SensorState::Idle);
        assert_eq!(sensor.last_value(), 0);
    }

    #[test]
    fn test_read_and_wait_budget_exhausted() {
        let config = SensorConfig::default()
            .with_warmup(WarmupPolicy::HoldRequests)
            .with_wait_budget_ms(1000);
        let (mut sensor, serial, timer) = started(config);

        let result = sensor.try_read_and_wait();
        assert!(matches!(result, Err(Mhz14Error::Timeout { budget_ms: 1000 })));
        assert!(timer.now_us() >= 1_000_000);
        assert_eq!(sensor.status(), SensorState::WarmingUp);
        assert_eq!(serial.frames_sent(), 0);
    }

    #[test]
    fn test_read_and_wait_write_fault_returns_zero() {
        let (mut sensor, serial, _timer) = started(SensorConfig::default().with_warmup_ms(0));
        serial.set_fail_writes(true);

        assert!(matches!(sensor.try_read_and_wait(), Err(Mhz14Error::Io(_))));
        assert_eq!(sensor.status(), SensorState::Idle);
        assert_eq!(sensor.read_and_wait(), 0);
    }
}
