// src/test_utils.rs

// Mock serial port and clock shared by the unit tests. Both hand out cloned
// handles so a test can keep poking the line and the clock while the driver
// owns its copies.

use crate::common::{
    frame::{checksum, FRAME_LEN, READ_CMD, START_BYTE},
    hal_traits::{Mhz14Serial, Mhz14Timer},
};
use core::cell::{Cell, RefCell};
use heapless::{Deque, Vec};
use std::rc::Rc;

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockCommError;

// --- Mock Timer ---
#[derive(Clone, Default)]
pub struct MockTimer {
    now_us: Rc<Cell<u64>>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_ms(ms: u32) -> Self {
        let timer = Self::new();
        timer.now_us.set(ms as u64 * 1000);
        timer
    }

    pub fn advance_ms(&self, ms: u32) {
        self.now_us.set(self.now_us.get() + ms as u64 * 1000);
    }

    pub fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}

impl Mhz14Timer for MockTimer {
    fn now_ms(&self) -> u32 {
        (self.now_us.get() / 1000) as u32
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us.set(self.now_us.get() + us as u64);
    }
}

// --- Mock Line ---
#[derive(Default)]
pub struct MockLine {
    pub baud_rate: Option<u32>,
    pub rx: Deque<u8, 128>,
    pub tx: Vec<u8, 128>,
    /// Queued into `rx` each time a full request frame has been written.
    pub auto_reply: Option<[u8; FRAME_LEN]>,
    /// Writes fail with an I/O error while set.
    pub fail_writes: bool,
    /// Writes report `WouldBlock` while set.
    pub stall_writes: bool,
}

// --- Mock Serial ---
#[derive(Clone, Default)]
pub struct MockSerial {
    line: Rc<RefCell<MockLine>>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_read_data(&self, data: &[u8]) {
        let mut line = self.line.borrow_mut();
        for byte in data {
            line.rx.push_back(*byte).expect("mock rx queue full");
        }
    }

    pub fn set_auto_reply(&self, frame: Option<[u8; FRAME_LEN]>) {
        self.line.borrow_mut().auto_reply = frame;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.line.borrow_mut().fail_writes = fail;
    }

    pub fn set_stall_writes(&self, stall: bool) {
        self.line.borrow_mut().stall_writes = stall;
    }

    pub fn pending_rx(&self) -> usize {
        self.line.borrow().rx.len()
    }

    pub fn written(&self) -> std::vec::Vec<u8> {
        self.line.borrow().tx.iter().copied().collect()
    }

    /// Number of complete request frames written so far.
    pub fn frames_sent(&self) -> usize {
        self.line.borrow().tx.len() / FRAME_LEN
    }

    pub fn baud_rate(&self) -> Option<u32> {
        self.line.borrow().baud_rate
    }
}

impl Mhz14Serial for MockSerial {
    type Error = MockCommError;

    fn open(&mut self, baud_rate: u32) -> Result<(), Self::Error> {
        self.line.borrow_mut().baud_rate = Some(baud_rate);
        Ok(())
    }

    fn bytes_available(&mut self) -> usize {
        self.line.borrow().rx.len()
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        let mut line = self.line.borrow_mut();
        line.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        let mut line = self.line.borrow_mut();
        if line.fail_writes {
            return Err(nb::Error::Other(MockCommError));
        }
        if line.stall_writes {
            return Err(nb::Error::WouldBlock);
        }
        line.tx.push(byte).map_err(|_| nb::Error::Other(MockCommError))?;

        if line.tx.len() % FRAME_LEN == 0 {
            if let Some(reply) = line.auto_reply {
                for b in reply {
                    line.rx.push_back(b).map_err(|_| nb::Error::Other(MockCommError))?;
                }
            }
        }
        Ok(())
    }
}

/// A response frame with a correct check byte.
pub fn response_frame(concentration: u16, temperature: u8) -> [u8; FRAME_LEN] {
    let [hi, lo] = concentration.to_be_bytes();
    let mut frame = [START_BYTE, READ_CMD, hi, lo, temperature, 0, 0, 0, 0];
    frame[FRAME_LEN - 1] = checksum(&frame[..FRAME_LEN - 1]);
    frame
}
