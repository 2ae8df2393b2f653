use x86_64::instructions::port::Port;

use super::status::{ControllerStatus, Register, I8042_DATA_PORT, I8042_STATUS_PORT};

/// Raw register access to an 8042-compatible controller.
///
/// Every call is a single port access; no call waits for the controller.
pub trait ControllerIo {
    fn read_status(&mut self) -> ControllerStatus;
    fn read_data(&mut self) -> u8;
    fn write(&mut self, register: Register, value: u8);
}

/// The legacy controller behind I/O ports 0x60 and 0x64.
pub struct PortIo {
    status_port: Port<u8>,
    data_port: Port<u8>,
}

impl PortIo {
    /// # Safety
    ///
    /// The caller must own the 8042 ports: no other code may poll or write
    /// them while this value is alive.
    pub unsafe fn new() -> PortIo {
        PortIo {
            status_port: Port::new(I8042_STATUS_PORT),
            data_port: Port::new(I8042_DATA_PORT),
        }
    }
}

impl ControllerIo for PortIo {
    fn read_status(&mut self) -> ControllerStatus {
        ControllerStatus::from_bits_retain(unsafe { self.status_port.read() })
    }

    fn read_data(&mut self) -> u8 {
        unsafe { self.data_port.read() }
    }

    fn write(&mut self, register: Register, value: u8) {
        unsafe {
            match register {
                // Reads of 0x64 return status, writes go to the command register.
                Register::Command => self.status_port.write(value),
                Register::Data => self.data_port.write(value),
            }
        }
    }
}
