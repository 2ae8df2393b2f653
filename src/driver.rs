use log::{info, warn};

use crate::error::{BestEffort, ControllerError};
use crate::hardware::clock::Clock;
use crate::hardware::i8042::{Controller, Keystroke, Reinject};
use crate::hardware::io::ControllerIo;
use crate::task::keyboard::{KeyboardStatus, ScancodeTranslator};
use crate::task::scancode::init_scancode_map;

/// A controller plus the translator attached to it by [`Keyboard::initialize`].
pub struct Keyboard<I, C> {
    controller: Controller<I, C>,
    translator: Option<ScancodeTranslator<'static>>,
}

impl<I: ControllerIo, C: Clock> Keyboard<I, C> {
    pub fn new(controller: Controller<I, C>) -> Keyboard<I, C> {
        Keyboard {
            controller,
            translator: None,
        }
    }

    pub fn controller(&self) -> &Controller<I, C> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<I, C> {
        &mut self.controller
    }

    /// Builds the scancode map and attaches a translator. A second call
    /// keeps the current modifier state.
    pub fn initialize(&mut self) -> Result<(), &'static str> {
        let map = init_scancode_map().ok_or("scancode map unavailable")?;

        if self.translator.is_none() {
            self.translator = Some(ScancodeTranslator::new(map));
        }

        info!("i8042: keyboard initialized");
        Ok(())
    }

    /// Swaps the controller, keeping the translator and its modifier state.
    pub fn set_controller(&mut self, controller: Controller<I, C>) {
        self.controller = controller;
    }

    pub fn read_keystroke(&mut self, reinject: Reinject) -> Result<Keystroke, ControllerError> {
        self.controller.read_keystroke(reinject)
    }

    /// Keycode for `raw`, or 0 when the byte carries nothing to report or
    /// the keyboard is not initialized yet.
    pub fn translate(&mut self, raw: u8) -> u8 {
        match self.translator.as_mut() {
            Some(translator) => translator.translate(raw),
            None => {
                warn!("i8042: scancode {:#04x} translated before initialize", raw);
                0
            }
        }
    }

    /// Mouse bytes and bytes without a keycode give `Ok(None)`.
    pub fn read_keycode(&mut self, reinject: Reinject) -> Result<Option<u8>, ControllerError> {
        let keystroke = self.read_keystroke(reinject)?;
        if keystroke.is_mouse {
            return Ok(None);
        }

        match self.translate(keystroke.scancode) {
            0 => Ok(None),
            keycode => Ok(Some(keycode)),
        }
    }

    /// All clear before [`Keyboard::initialize`].
    pub fn modifiers(&self) -> KeyboardStatus {
        self.translator
            .as_ref()
            .map(|translator| translator.status())
            .unwrap_or_default()
    }

    pub fn set_mouse_enabled(&mut self, enabled: bool) -> BestEffort {
        self.controller.set_mouse_enabled(enabled)
    }
}
