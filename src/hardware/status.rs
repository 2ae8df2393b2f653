use bitflags::bitflags;

/// Status register (read) and command register (write).
pub const I8042_STATUS_PORT: u16 = 0x64;
/// Output buffer (read) and input buffer for command arguments (write).
pub const I8042_DATA_PORT: u16 = 0x60;

bitflags! {
    /// 8042 status register, sampled fresh on every poll.
    ///
    /// ```text
    /// |7|6|5|4|3|2|1|0|
    ///  | | | | | | | `-- output buffer (0x60) has data for the host
    ///  | | | | | | `---- input buffer (0x60/0x64) still holds data for the 8042
    ///  | | | | | `------ system flag
    ///  | | | | `-------- last write was a command (1) or data (0)
    ///  | | | `---------- keyboard enabled (inhibit switch)
    ///  | | `------------ transmit timeout
    ///  | `-------------- receive timeout
    ///  `---------------- parity error
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControllerStatus: u8 {
        const OUTPUT_FULL = 1 << 0;
        const INPUT_FULL = 1 << 1;
        const SYSTEM_FLAG = 1 << 2;
        const COMMAND = 1 << 3;
        const KEYBOARD_ENABLED = 1 << 4;
        /// On the controllers this driver targets the bit is also raised for
        /// bytes coming from the auxiliary (mouse) port.
        const TRANSMIT_TIMEOUT = 1 << 5;
        const RECEIVE_TIMEOUT = 1 << 6;
        const PARITY_ERROR = 1 << 7;
    }
}

impl ControllerStatus {
    pub fn has_output(self) -> bool {
        self.contains(ControllerStatus::OUTPUT_FULL)
    }

    pub fn input_busy(self) -> bool {
        self.contains(ControllerStatus::INPUT_FULL)
    }

    pub fn parity_error(self) -> bool {
        self.contains(ControllerStatus::PARITY_ERROR)
    }

    pub fn from_mouse(self) -> bool {
        self.contains(ControllerStatus::TRANSMIT_TIMEOUT)
    }
}

/// The two writable registers of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Command,
    Data,
}

impl Register {
    pub fn port(self) -> u16 {
        match self {
            Register::Command => I8042_STATUS_PORT,
            Register::Data => I8042_DATA_PORT,
        }
    }
}

/// Controller commands written to the command register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    DisableMouse = 0xa7,
    EnableMouse = 0xa8,
    DisableKeyboard = 0xad,
    EnableKeyboard = 0xae,
    /// Next byte written to the data port is placed in the output buffer
    /// as if the keyboard had sent it.
    WriteOutputBuffer = 0xd2,
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}
