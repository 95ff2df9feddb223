// src/sensor/state_machine.rs

use super::io_helpers::FramePoll;
use super::{Mhz14, ReadObserver, SensorState};
use crate::common::{
    config::WarmupPolicy,
    error::{Mhz14Error, ReadError},
    frame::{parse_response, FRAME_LEN},
    hal_traits::{Mhz14Serial, Mhz14Timer},
    timing,
};

impl<S, T, C> Mhz14<S, T, C>
where
    S: Mhz14Serial,
    T: Mhz14Timer,
    C: ReadObserver,
{
    /// Advances the session by at most one state transition.
    ///
    /// Never waits on the sensor beyond the reader's short inter-byte wait.
    /// An `Err` means the serial port failed; the session has already moved
    /// to [`SensorState::Error`] and recovers on the following ticks.
    pub fn tick(&mut self) -> Result<(), Mhz14Error<S::Error>> {
        let now = self.timer.now_ms();
        let previous = self.state;

        let result = match self.state {
            SensorState::ColdInit => {
                self.cold_init();
                Ok(())
            }
            SensorState::WarmingUp => {
                let temperature = self.last_reading.map(|r| r.temperature);
                self.update_warmup(now, temperature);
                if self.warmup_satisfied {
                    self.state = SensorState::Idle;
                }
                Ok(())
            }
            SensorState::Idle => self.start_exchange(),
            SensorState::AwaitingResponse => self.collect_response(now),
            SensorState::ResponseReady => {
                self.state = SensorState::Idle;
                Ok(())
            }
            SensorState::Error => {
                self.settle_error();
                Ok(())
            }
        };

        if self.state != previous {
            debug!("state {:?} -> {:?}", previous, self.state);
        }
        result
    }

    fn cold_init(&mut self) {
        self.consecutive_errors = 0;
        self.partial_since = None;
        let flushed = self.flush_input(self.config.flush_limit as usize);
        if flushed > 0 {
            debug!("cold init discarded {} stale bytes", flushed);
        }

        self.state = if self.config.warmup == WarmupPolicy::HoldRequests && !self.warmup_satisfied {
            SensorState::WarmingUp
        } else {
            SensorState::Idle
        };
    }

    fn start_exchange(&mut self) -> Result<(), Mhz14Error<S::Error>> {
        if !self.pending_request {
            return Ok(());
        }
        self.pending_request = false;

        match self.send_request() {
            Ok(()) => {
                self.request_sent_at = self.timer.now_ms();
                self.partial_since = None;
                self.state = SensorState::AwaitingResponse;
                Ok(())
            }
            Err(e) => {
                self.fail(ReadError::Transport);
                Err(e)
            }
        }
    }

    fn collect_response(&mut self, now: u32) -> Result<(), Mhz14Error<S::Error>> {
        let poll = match self.poll_frame(now) {
            Ok(poll) => poll,
            Err(e) => {
                self.fail(ReadError::Transport);
                return Err(e);
            }
        };

        match poll {
            FramePoll::Pending { partial: false } => {
                if timing::ms_timeout(now, self.request_sent_at, self.config.read_timeout_ms) {
                    self.fail(ReadError::NoAnswer);
                }
            }
            FramePoll::Pending { partial: true } => {}
            FramePoll::TimedOut { received } => {
                warn!("only {} of {} bytes received", received, FRAME_LEN);
                self.fail(ReadError::MissingData);
            }
            FramePoll::Complete(frame) => self.accept_frame(now, &frame),
        }
        Ok(())
    }

    fn accept_frame(&mut self, now: u32, frame: &[u8; FRAME_LEN]) {
        let reading = match parse_response(frame) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("rejected frame {:?}: {:?}", frame, e);
                self.fail(e.into());
                return;
            }
        };

        self.update_warmup(now, Some(reading.temperature));
        if !self.warmup_satisfied {
            self.fail(ReadError::NotWarmedUp);
            return;
        }

        self.last_reading = Some(reading);
        self.last_error = None;
        self.consecutive_errors = 0;
        self.notify(reading.concentration, reading.temperature, None);
        self.state = SensorState::ResponseReady;
    }

    fn settle_error(&mut self) {
        let error = self.last_error.unwrap_or(ReadError::UndefinedState);
        self.notify(0, 0, Some(error));

        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        if self.consecutive_errors >= self.config.error_flush_threshold {
            let flushed = self.flush_input(self.config.flush_limit as usize);
            warn!(
                "{} consecutive errors, flushed {} bytes",
                self.consecutive_errors, flushed
            );
            self.consecutive_errors = 0;
        }
        self.state = SensorState::Idle;
    }

    /// Opens the warm-up gate once the preheat time has passed or the
    /// sensor reports a temperature above the threshold. Never closes it.
    fn update_warmup(&mut self, now: u32, temperature: Option<u8>) {
        if self.warmup_satisfied {
            return;
        }
        let by_time = timing::ms_timeout(now, self.warmup_started_at, self.config.warmup_ms);
        let by_temperature = temperature.is_some_and(|t| t > self.config.warm_temperature);
        if by_time || by_temperature {
            self.warmup_satisfied = true;
            debug!("warm-up complete");
        }
    }

    fn fail(&mut self, error: ReadError) {
        warn!("read cycle failed: {:?}", error);
        self.last_error = Some(error);
        self.partial_since = None;
        self.state = SensorState::Error;
    }

    fn notify(&mut self, value: u16, temperature: u8, error: Option<ReadError>) {
        if let Some(callback) = self.callback.as_mut() {
            callback.on_read_complete(value, temperature, error);
        }
    }
}
