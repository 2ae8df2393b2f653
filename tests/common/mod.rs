//! Simulated 8042 and clock for driving `Controller` off hardware.

#![allow(dead_code)]

use std::collections::VecDeque;

use i8042_poll::hardware::clock::Clock;
use i8042_poll::hardware::i8042::Controller;
use i8042_poll::hardware::io::ControllerIo;
use i8042_poll::hardware::status::{ControllerStatus, Register};
use i8042_poll::PollConfig;

const WRITE_OUTPUT_BUFFER: u8 = 0xd2;

#[derive(Default)]
pub struct SimController {
    /// Pending output bytes with the extra status bits they arrive with.
    output: VecDeque<(ControllerStatus, u8)>,
    /// Status reads before queued output becomes visible.
    pub output_delay: usize,
    /// Status reads that still report a full input buffer.
    pub busy_reads: usize,
    /// Input buffer never drains.
    pub stuck: bool,
    pub writes: Vec<(Register, u8)>,
    pub status_reads: usize,
    last_command: Option<u8>,
}

impl SimController {
    pub fn new() -> SimController {
        SimController::default()
    }

    pub fn with_keys(scancodes: &[u8]) -> SimController {
        let mut sim = SimController::new();
        for &scancode in scancodes {
            sim.push(ControllerStatus::empty(), scancode);
        }
        sim
    }

    pub fn push(&mut self, flags: ControllerStatus, byte: u8) {
        self.output.push_back((flags, byte));
    }

    pub fn pending(&self) -> usize {
        self.output.len()
    }
}

impl ControllerIo for SimController {
    fn read_status(&mut self) -> ControllerStatus {
        self.status_reads += 1;
        let mut status = ControllerStatus::empty();

        if self.output_delay > 0 {
            self.output_delay -= 1;
        } else if let Some((flags, _)) = self.output.front() {
            status |= ControllerStatus::OUTPUT_FULL | *flags;
        }

        if self.stuck {
            status |= ControllerStatus::INPUT_FULL;
        } else if self.busy_reads > 0 {
            self.busy_reads -= 1;
            status |= ControllerStatus::INPUT_FULL;
        }

        status
    }

    fn read_data(&mut self) -> u8 {
        self.output.pop_front().map(|(_, byte)| byte).unwrap_or(0)
    }

    fn write(&mut self, register: Register, value: u8) {
        self.writes.push((register, value));
        match register {
            Register::Command => self.last_command = Some(value),
            Register::Data => {
                if self.last_command.take() == Some(WRITE_OUTPUT_BUFFER) {
                    self.output.push_front((ControllerStatus::empty(), value));
                }
            }
        }
    }
}

/// Time moves only when the driver stalls.
#[derive(Default)]
pub struct FakeClock {
    pub now: u64,
    pub stalls: usize,
}

impl Clock for FakeClock {
    fn now_us(&mut self) -> u64 {
        self.now
    }

    fn stall_us(&mut self, us: u64) {
        self.stalls += 1;
        self.now += us;
    }
}

pub type SimDriver = Controller<SimController, FakeClock>;

pub fn driver(sim: SimController) -> SimDriver {
    Controller::new(sim, FakeClock::default(), PollConfig::DEFAULT)
}
