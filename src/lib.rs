//! Polling driver for the legacy 8042 keyboard/mouse controller.
//!
//! The free functions below drive one process-wide controller instance on
//! ports 0x60/0x64. Each takes the driver lock with interrupts disabled and
//! never blocks longer than the configured poll budget.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod driver;
pub mod error;
pub mod hardware;
pub mod logger;
pub mod serial;
pub mod task;

use lazy_static::lazy_static;
use spin::Mutex;
use x86_64::instructions::interrupts;

pub use config::PollConfig;
pub use driver::Keyboard;
pub use error::{BestEffort, ControllerError};
pub use hardware::i8042::{Controller, Keystroke, Reinject};
pub use task::keyboard::{KeyboardStatus, ScancodeTranslator};
pub use task::scancode::ScancodeMap;

use hardware::clock::SystemClock;
use hardware::io::PortIo;

type PortController = Controller<PortIo, SystemClock>;

fn port_controller(config: PollConfig) -> PortController {
    Controller::new(unsafe { PortIo::new() }, SystemClock::from_config(&config), config)
}

lazy_static! {
    static ref KEYBOARD: Mutex<Keyboard<PortIo, SystemClock>> =
        Mutex::new(Keyboard::new(port_controller(PollConfig::DEFAULT)));
}

fn with_keyboard<R>(f: impl FnOnce(&mut Keyboard<PortIo, SystemClock>) -> R) -> R {
    interrupts::without_interrupts(|| f(&mut KEYBOARD.lock()))
}

/// Builds the scancode map and attaches a translator to the driver.
///
/// Must run before [`translate_scancode`]. Calling it again keeps the current
/// modifier state.
pub fn initialize() -> Result<(), &'static str> {
    with_keyboard(|keyboard| keyboard.initialize())
}

/// Replaces the poll budget and time source. Modifier state is kept.
pub fn configure(config: PollConfig) {
    with_keyboard(|keyboard| keyboard.set_controller(port_controller(config)));
}

/// Next byte from the controller, or an error once the poll budget runs out.
pub fn read_keystroke(reinject: Reinject) -> Result<Keystroke, ControllerError> {
    with_keyboard(|keyboard| keyboard.read_keystroke(reinject))
}

/// Keycode for `raw`, or 0 when the byte carries nothing to report.
pub fn translate_scancode(raw: u8) -> u8 {
    with_keyboard(|keyboard| keyboard.translate(raw))
}

/// Reads one byte and translates it.
pub fn read_keycode(reinject: Reinject) -> Result<Option<u8>, ControllerError> {
    with_keyboard(|keyboard| keyboard.read_keycode(reinject))
}

/// Snapshot of the modifier flags; all clear before [`initialize`].
pub fn modifiers() -> KeyboardStatus {
    with_keyboard(|keyboard| keyboard.modifiers())
}

/// Always succeeds from the caller's side; see [`BestEffort`].
pub fn set_mouse_enabled(enabled: bool) -> BestEffort {
    with_keyboard(|keyboard| keyboard.set_mouse_enabled(enabled))
}
