//! Scancode set 1 to ASCII, US standard layout, unshifted.

use conquer_once::spin::OnceCell;
use log::trace;

/// Runs of consecutive make codes and the characters they produce.
const US_STD_ROWS: &[(u8, &[u8])] = &[
    (0x01, b"\x1b1234567890-=\x08\tqwertyuiop[]\n"),
    (0x1e, b"asdfghjkl;'`"),
    (0x2b, b"\\zxcvbnm,./"),
    (0x37, b"*"),
    (0x39, b" "),
    (0x4a, b"-"),
    (0x4e, b"+"),
];

static SCANCODE_MAP: OnceCell<ScancodeMap> = OnceCell::uninit();

/// Byte-to-character table indexed by the full scancode byte.
///
/// Unmapped entries are 0.
#[derive(Clone, PartialEq, Eq)]
pub struct ScancodeMap([u8; 256]);

impl ScancodeMap {
    pub const fn us_std() -> ScancodeMap {
        let mut table = [0u8; 256];

        let mut row = 0;
        while row < US_STD_ROWS.len() {
            let (first, chars) = US_STD_ROWS[row];
            let mut i = 0;
            while i < chars.len() {
                table[first as usize + i] = chars[i];
                i += 1;
            }
            row += 1;
        }

        ScancodeMap(table)
    }

    pub fn lookup(&self, scancode: u8) -> u8 {
        self.0[scancode as usize]
    }
}

impl core::fmt::Debug for ScancodeMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mapped = self.0.iter().filter(|&&c| c != 0).count();
        f.debug_struct("ScancodeMap").field("mapped", &mapped).finish()
    }
}

/// Builds the global map on first call; later calls return the same table.
pub fn init_scancode_map() -> Option<&'static ScancodeMap> {
    if SCANCODE_MAP.try_init_once(ScancodeMap::us_std).is_err() {
        trace!("scancode map already built");
    }
    SCANCODE_MAP.try_get().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_rows() {
        let map = ScancodeMap::us_std();
        assert_eq!(map.lookup(0x10), b'q');
        assert_eq!(map.lookup(0x19), b'p');
        assert_eq!(map.lookup(0x1e), b'a');
        assert_eq!(map.lookup(0x26), b'l');
        assert_eq!(map.lookup(0x2c), b'z');
        assert_eq!(map.lookup(0x32), b'm');
    }

    #[test]
    fn digit_row_and_controls() {
        let map = ScancodeMap::us_std();
        assert_eq!(map.lookup(0x01), 0x1b);
        assert_eq!(map.lookup(0x02), b'1');
        assert_eq!(map.lookup(0x0b), b'0');
        assert_eq!(map.lookup(0x0e), 0x08);
        assert_eq!(map.lookup(0x0f), b'\t');
        assert_eq!(map.lookup(0x1c), b'\n');
        assert_eq!(map.lookup(0x39), b' ');
        assert_eq!(map.lookup(0x35), b'/');
    }

    #[test]
    fn modifiers_and_high_bytes_unmapped() {
        let map = ScancodeMap::us_std();
        for code in [0x1d, 0x2a, 0x36, 0x38, 0x3a, 0x3b, 0x58] {
            assert_eq!(map.lookup(code), 0, "scancode {:#04x}", code);
        }
        assert!((0x80..=0xff).all(|code| map.lookup(code) == 0));
    }

    #[test]
    fn global_map_is_built_once() {
        let first = init_scancode_map().unwrap();
        let second = init_scancode_map().unwrap();
        assert!(core::ptr::eq(first, second));
        assert_eq!(first, &ScancodeMap::us_std());
    }
}
