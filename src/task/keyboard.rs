//! Scancode to keycode translation with modifier tracking.
//!
//! Only single-byte set 1 codes are understood. Right ctrl and right alt
//! arrive as `e0`-escaped pairs and are therefore never tracked.

use super::scancode::ScancodeMap;

const RELEASE_FLAG: u8 = 0x80;

const LEFT_CTRL: u8 = 0x1d;
const LEFT_SHIFT: u8 = 0x2a;
const RIGHT_SHIFT: u8 = 0x36;
const LEFT_ALT: u8 = 0x38;

/// Controller and keyboard replies that are not keystrokes.
mod reply {
    pub const KEY_ERROR: u8 = 0x00;
    pub const SELF_TEST_OK: u8 = 0xaa;
    pub const ECHO: u8 = 0xee;
    pub const ACK: u8 = 0xfa;
    pub const SELF_TEST_FAILED: u8 = 0xfc;
    pub const INTERNAL_FAILURE: u8 = 0xfd;
    pub const RESEND: u8 = 0xfe;
    pub const ERROR: u8 = 0xff;
}

/// Press state of the tracked modifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardStatus {
    pub lctrl: bool,
    pub lshift: bool,
    pub rshift: bool,
    pub lalt: bool,
}

impl KeyboardStatus {
    pub const fn new() -> KeyboardStatus {
        KeyboardStatus {
            lctrl: false,
            lshift: false,
            rshift: false,
            lalt: false,
        }
    }

    pub fn shift(&self) -> bool {
        self.lshift || self.rshift
    }

    fn flag_mut(&mut self, code: u8) -> Option<&mut bool> {
        match code {
            LEFT_CTRL => Some(&mut self.lctrl),
            LEFT_SHIFT => Some(&mut self.lshift),
            RIGHT_SHIFT => Some(&mut self.rshift),
            LEFT_ALT => Some(&mut self.lalt),
            _ => None,
        }
    }
}

/// US layout symbols above the digit row.
fn shifted_digit(c: u8) -> Option<u8> {
    let symbol = match c {
        b'1' => b'!',
        b'2' => b'@',
        b'3' => b'#',
        b'4' => b'$',
        b'5' => b'%',
        b'6' => b'^',
        b'7' => b'&',
        b'8' => b'*',
        b'9' => b'(',
        b'0' => b')',
        _ => return None,
    };
    Some(symbol)
}

pub fn is_release(scancode: u8) -> bool {
    scancode & RELEASE_FLAG != 0
}

/// Decodes raw scancodes into keycodes; 0 means "nothing to report".
pub struct ScancodeTranslator<'a> {
    map: &'a ScancodeMap,
    status: KeyboardStatus,
}

impl<'a> ScancodeTranslator<'a> {
    pub fn new(map: &'a ScancodeMap) -> ScancodeTranslator<'a> {
        ScancodeTranslator {
            map,
            status: KeyboardStatus::new(),
        }
    }

    pub fn status(&self) -> KeyboardStatus {
        self.status
    }

    /// Never fails: anything unknown becomes 0.
    pub fn translate(&mut self, raw: u8) -> u8 {
        let released = is_release(raw);
        let code = raw & !RELEASE_FLAG;

        if let Some(flag) = self.status.flag_mut(code) {
            *flag = !released;
            return 0;
        }

        if released {
            return 0;
        }

        // With the release bit filtered above only KEY_ERROR can still match;
        // the rest are listed so the set stays complete.
        match raw {
            reply::KEY_ERROR
            | reply::SELF_TEST_OK
            | reply::ECHO
            | reply::ACK
            | reply::SELF_TEST_FAILED
            | reply::INTERNAL_FAILURE
            | reply::RESEND
            | reply::ERROR => return 0,
            _ => {}
        }

        let c = self.map.lookup(code);
        if self.status.shift() {
            if let Some(symbol) = shifted_digit(c) {
                return symbol;
            }
            if c.is_ascii_lowercase() {
                return c.to_ascii_uppercase();
            }
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUSEKEEPING: [u8; 8] = [0x00, 0xaa, 0xee, 0xfa, 0xfc, 0xfd, 0xfe, 0xff];
    const MODIFIERS: [u8; 4] = [LEFT_CTRL, LEFT_SHIFT, RIGHT_SHIFT, LEFT_ALT];

    fn map() -> &'static ScancodeMap {
        static MAP: ScancodeMap = ScancodeMap::us_std();
        &MAP
    }

    #[test]
    fn modifier_press_and_release_restore_state() {
        let mut translator = ScancodeTranslator::new(map());
        for code in MODIFIERS {
            let before = translator.status();
            assert_eq!(translator.translate(code), 0);
            assert_ne!(translator.status(), before);
            assert_eq!(translator.translate(code | RELEASE_FLAG), 0);
            assert_eq!(translator.status(), before);
        }
    }

    #[test]
    fn each_modifier_sets_its_own_flag() {
        let mut translator = ScancodeTranslator::new(map());
        translator.translate(LEFT_CTRL);
        translator.translate(LEFT_ALT);
        translator.translate(RIGHT_SHIFT);
        assert_eq!(
            translator.status(),
            KeyboardStatus {
                lctrl: true,
                lshift: false,
                rshift: true,
                lalt: true,
            }
        );
    }

    #[test]
    fn unshifted_press_matches_map_and_release_is_silent() {
        let mut translator = ScancodeTranslator::new(map());
        for code in 0x01..0x80u8 {
            if MODIFIERS.contains(&code) {
                continue;
            }
            assert_eq!(translator.translate(code), map().lookup(code), "{:#04x}", code);
            assert_eq!(translator.translate(code | RELEASE_FLAG), 0, "{:#04x}", code);
        }
    }

    #[test]
    fn shift_uppercases_letters() {
        let mut translator = ScancodeTranslator::new(map());
        translator.translate(RIGHT_SHIFT);
        assert_eq!(translator.translate(0x10), b'Q');
        assert_eq!(translator.translate(0x32), b'M');
        // Punctuation has no shifted form in this table.
        assert_eq!(translator.translate(0x33), b',');
    }

    #[test]
    fn shift_maps_digit_row_to_symbols() {
        let mut translator = ScancodeTranslator::new(map());
        translator.translate(LEFT_SHIFT);
        let symbols: [u8; 10] = *b"!@#$%^&*()";
        for (code, expected) in (0x02..=0x0bu8).zip(symbols) {
            assert_eq!(translator.translate(code), expected);
        }
    }

    #[test]
    fn housekeeping_bytes_never_produce_keycodes() {
        let mut translator = ScancodeTranslator::new(map());
        for shifted in [false, true] {
            if shifted {
                translator.translate(RIGHT_SHIFT);
            }
            for code in HOUSEKEEPING {
                assert_eq!(translator.translate(code), 0, "{:#04x}", code);
            }
        }
    }

    #[test]
    fn self_test_ok_reads_as_left_shift_release() {
        let mut translator = ScancodeTranslator::new(map());
        translator.translate(LEFT_SHIFT);
        assert!(translator.status().lshift);
        assert_eq!(translator.translate(reply::SELF_TEST_OK), 0);
        assert!(!translator.status().lshift);
    }

    #[test]
    fn shift_toggle_scenario() {
        let mut translator = ScancodeTranslator::new(map());
        assert_eq!(translator.translate(0x2a), 0);
        assert_eq!(translator.translate(0x1e), b'A');
        assert_eq!(translator.translate(0x2a | 0x80), 0);
        assert_eq!(translator.translate(0x1e), b'a');
    }
}
