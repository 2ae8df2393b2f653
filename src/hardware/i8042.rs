//! Polling protocol for the 8042 keyboard controller.
//!
//! Nothing here waits on an interrupt. Every read and write spins against a
//! [`Deadline`] taken from the configured budget, so the worst case is a small
//! constant number of port accesses.

use log::{debug, info, trace, warn};

use super::clock::{Clock, Deadline};
use super::io::ControllerIo;
use super::status::{Command, Register};
use crate::config::PollConfig;
use crate::error::{BestEffort, ControllerError};

/// What to do with a scancode once it has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reinject {
    /// Write the byte back into the output buffer so the next reader sees it again.
    Unget,
    /// Keep the byte; the controller queue loses it.
    Consume,
}

/// A byte taken from the controller output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub scancode: u8,
    /// Derived from the transmit-timeout status bit.
    pub is_mouse: bool,
    /// Outcome of the write-back, `None` for [`Reinject::Consume`].
    pub reinjection: Option<BestEffort>,
}

pub struct Controller<I, C> {
    io: I,
    clock: C,
    config: PollConfig,
}

impl<I: ControllerIo, C: Clock> Controller<I, C> {
    /// A zero `stall_us` is raised to 1: a clock that only advances by
    /// stalling would otherwise never reach the deadline.
    pub fn new(io: I, clock: C, mut config: PollConfig) -> Controller<I, C> {
        config.stall_us = config.stall_us.max(1);
        Controller { io, clock, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn io(&self) -> &I {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut I {
        &mut self.io
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Samples the status register once and takes the pending byte, if any.
    ///
    /// Returns `Ok(None)` when the output buffer is empty. A byte flagged with a
    /// parity error is still consumed from the data port, then reported as
    /// [`ControllerError::ParityError`].
    pub fn read_controller_byte(&mut self) -> Result<Option<(u8, bool)>, ControllerError> {
        let status = self.io.read_status();
        if !status.has_output() {
            return Ok(None);
        }

        let byte = self.io.read_data();
        if status.parity_error() {
            return Err(ControllerError::ParityError);
        }

        Ok(Some((byte, status.from_mouse())))
    }

    /// Waits for the input buffer to drain, then writes `value` to `register`.
    ///
    /// The status register is sampled at most `budget_us / stall_us` times.
    /// On timeout nothing is written.
    pub fn write_controller_byte(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), ControllerError> {
        let deadline = Deadline::after(&mut self.clock, self.config.budget_us);

        while self.io.read_status().input_busy() {
            if deadline.expires_within(&mut self.clock, self.config.stall_us) {
                trace!(
                    "i8042: input buffer still full, dropping {:#04x} to {:?}",
                    value,
                    register
                );
                return Err(ControllerError::PollTimeout);
            }
            self.clock.stall_us(self.config.stall_us);
        }

        self.io.write(register, value);
        Ok(())
    }

    fn send_command(&mut self, command: Command) -> BestEffort {
        self.write_controller_byte(Register::Command, command.into()).into()
    }

    /// Polls until a byte arrives or the budget runs out, making at most
    /// `budget_us / stall_us` attempts (12000 with the default config).
    ///
    /// Parity failures do not end the wait; if the window closes right after
    /// one, that failure is what gets reported.
    pub fn read_keystroke(&mut self, reinject: Reinject) -> Result<Keystroke, ControllerError> {
        let deadline = Deadline::after(&mut self.clock, self.config.budget_us);

        let (scancode, is_mouse) = loop {
            let failure = match self.read_controller_byte() {
                Ok(Some(byte)) => break byte,
                Ok(None) => ControllerError::PollTimeout,
                Err(err) => {
                    warn!("i8042: discarded byte with bad parity");
                    err
                }
            };

            if deadline.expires_within(&mut self.clock, self.config.stall_us) {
                trace!("i8042: no keystroke within {}us", self.config.budget_us);
                return Err(failure);
            }
            self.clock.stall_us(self.config.stall_us);
        };

        debug!("i8042: scancode {:#04x} (mouse: {})", scancode, is_mouse);

        let reinjection = match reinject {
            Reinject::Unget => Some(self.unget(scancode)),
            Reinject::Consume => None,
        };

        Ok(Keystroke {
            scancode,
            is_mouse,
            reinjection,
        })
    }

    /// Echoes `scancode` back into the output buffer with keyboard scanning
    /// paused. Every step is attempted even if an earlier one was dropped.
    fn unget(&mut self, scancode: u8) -> BestEffort {
        let outcome = self
            .send_command(Command::DisableKeyboard)
            .and(self.send_command(Command::WriteOutputBuffer))
            .and(self.write_controller_byte(Register::Data, scancode).into())
            .and(self.send_command(Command::EnableKeyboard));

        if !outcome.delivered() {
            warn!("i8042: failed to unget scancode {:#04x}", scancode);
        }
        outcome
    }

    /// Enables or disables the auxiliary (mouse) channel.
    pub fn set_mouse_enabled(&mut self, enabled: bool) -> BestEffort {
        let command = if enabled {
            Command::EnableMouse
        } else {
            Command::DisableMouse
        };

        let outcome = self.send_command(command);
        match outcome {
            BestEffort::Delivered => {
                info!("i8042: mouse channel {}", if enabled { "enabled" } else { "disabled" })
            }
            BestEffort::Dropped => warn!("i8042: mouse command {:?} dropped", command),
        }
        outcome
    }
}
