//! PS/2 Set-1 scancode decoding.
//!
//! Decoding is a pure step function over [`Modifiers`]; [`SharedModifiers`]
//! wraps it for the interrupt handler, which is the only writer.

use crate::key::Key;
use bitflags::bitflags;
use core::sync::atomic::{AtomicU8, Ordering};

/// Prefix byte announcing an extended scancode.
pub const EXTENDED_PREFIX: u8 = 0xE0;

/// Set on key-release scancodes.
const RELEASE_BIT: u8 = 0x80;

const LEFT_SHIFT: u8 = 0x2A;
const RIGHT_SHIFT: u8 = 0x36;
const CTRL: u8 = 0x1D;
const ALT: u8 = 0x38;
const CAPS_LOCK: u8 = 0x3A;

/// US QWERTY, unshifted.
const KEYMAP: [u8; 58] = [
    0, 27, b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'0', b'-', b'=', 0x08,
    b'\t', b'q', b'w', b'e', b'r', b't', b'y', b'u', b'i', b'o', b'p', b'[', b']', b'\n',
    0, b'a', b's', b'd', b'f', b'g', b'h', b'j', b'k', b'l', b';', b'\'', b'`',
    0, b'\\', b'z', b'x', b'c', b'v', b'b', b'n', b'm', b',', b'.', b'/', 0,
    b'*', 0, b' ',
];

/// US QWERTY, shifted. Indexed like [`KEYMAP`].
const KEYMAP_SHIFTED: [u8; 58] = [
    0, 27, b'!', b'@', b'#', b'$', b'%', b'^', b'&', b'*', b'(', b')', b'_', b'+', 0x08,
    b'\t', b'Q', b'W', b'E', b'R', b'T', b'Y', b'U', b'I', b'O', b'P', b'{', b'}', b'\n',
    0, b'A', b'S', b'D', b'F', b'G', b'H', b'J', b'K', b'L', b':', b'"', b'~',
    0, b'|', b'Z', b'X', b'C', b'V', b'B', b'N', b'M', b'<', b'>', b'?', 0,
    b'*', 0, b' ',
];

bitflags! {
    /// Keyboard modifier and decoder state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either shift key is held.
        const SHIFT     = 1 << 0;
        /// Ctrl is held.
        const CTRL      = 1 << 1;
        /// Alt is held.
        const ALT       = 1 << 2;
        /// Caps lock is toggled on.
        const CAPS_LOCK = 1 << 3;
        /// The previous byte was the 0xE0 prefix.
        const EXTENDED  = 1 << 4;
    }
}

fn modifier_for(make_code: u8) -> Option<Modifiers> {
    match make_code {
        LEFT_SHIFT | RIGHT_SHIFT => Some(Modifiers::SHIFT),
        CTRL => Some(Modifiers::CTRL),
        ALT => Some(Modifiers::ALT),
        _ => None,
    }
}

fn extended_key(make_code: u8) -> Option<Key> {
    match make_code {
        0x48 => Some(Key::Up),
        0x50 => Some(Key::Down),
        0x4B => Some(Key::Left),
        0x4D => Some(Key::Right),
        0x47 => Some(Key::Home),
        0x4F => Some(Key::End),
        0x53 => Some(Key::Delete),
        0x49 => Some(Key::PageUp),
        0x51 => Some(Key::PageDown),
        _ => None,
    }
}

fn translate(make_code: u8, modifiers: Modifiers) -> Option<Key> {
    let table = if modifiers.contains(Modifiers::SHIFT) {
        &KEYMAP_SHIFTED
    } else {
        &KEYMAP
    };
    let mut ascii = *table.get(make_code as usize)?;
    if modifiers.contains(Modifiers::CAPS_LOCK) && ascii.is_ascii_alphabetic() {
        ascii ^= 0x20;
    }
    Key::from_ascii(ascii)
}

/// Decodes one scancode byte against `modifiers`.
///
/// Returns the updated state and the key event, if the byte completed one.
pub fn decode(mut modifiers: Modifiers, scancode: u8) -> (Modifiers, Option<Key>) {
    if scancode == EXTENDED_PREFIX {
        modifiers.insert(Modifiers::EXTENDED);
        return (modifiers, None);
    }

    let make_code = scancode & !RELEASE_BIT;

    if scancode & RELEASE_BIT != 0 {
        // Extended releases are not reported.
        if modifiers.contains(Modifiers::EXTENDED) {
            modifiers.remove(Modifiers::EXTENDED);
        } else if let Some(held) = modifier_for(make_code) {
            modifiers.remove(held);
        }
        return (modifiers, None);
    }

    if modifiers.contains(Modifiers::EXTENDED) {
        modifiers.remove(Modifiers::EXTENDED);
        return (modifiers, extended_key(make_code));
    }

    if let Some(held) = modifier_for(make_code) {
        modifiers.insert(held);
        return (modifiers, None);
    }

    if make_code == CAPS_LOCK {
        modifiers.toggle(Modifiers::CAPS_LOCK);
        return (modifiers, None);
    }

    (modifiers, translate(make_code, modifiers))
}

/// Modifier state shared between the interrupt handler and readers.
///
/// Only the interrupt handler calls [`SharedModifiers::decode`]; everyone
/// else only loads.
pub struct SharedModifiers(AtomicU8);

impl SharedModifiers {
    /// Creates a cleared state.
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    /// Returns the current state.
    pub fn get(&self) -> Modifiers {
        Modifiers::from_bits_truncate(self.0.load(Ordering::Acquire))
    }

    /// Returns true while ctrl is held.
    pub fn ctrl_held(&self) -> bool {
        self.get().contains(Modifiers::CTRL)
    }

    /// Clears every modifier and a pending prefix.
    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }

    /// Decodes one scancode, updating the shared state.
    pub fn decode(&self, scancode: u8) -> Option<Key> {
        let (next, key) = decode(self.get(), scancode);
        self.0.store(next.bits(), Ordering::Release);
        key
    }
}

impl Default for SharedModifiers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn decode_all(modifiers: &SharedModifiers, bytes: &[u8]) -> Vec<Key> {
        bytes.iter().filter_map(|&b| modifiers.decode(b)).collect()
    }

    #[test]
    fn test_letters_follow_shift() {
        let m = SharedModifiers::new();
        assert_eq!(m.decode(0x1E), Some(Key::Char(b'a')));

        assert_eq!(m.decode(LEFT_SHIFT), None);
        assert_eq!(m.decode(0x1E), Some(Key::Char(b'A')));
        assert_eq!(m.decode(0x02), Some(Key::Char(b'!')));

        assert_eq!(m.decode(LEFT_SHIFT | RELEASE_BIT), None);
        assert_eq!(m.decode(0x1E), Some(Key::Char(b'a')));
    }

    #[test]
    fn test_extended_prefix_yields_synthetic_key_only() {
        let m = SharedModifiers::new();
        assert_eq!(decode_all(&m, &[0xE0, 0x48]), [Key::Up]);
        assert!(!m.get().contains(Modifiers::EXTENDED));

        assert_eq!(
            decode_all(&m, &[0xE0, 0x50, 0xE0, 0x4B, 0xE0, 0x4D, 0xE0, 0x47]),
            [Key::Down, Key::Left, Key::Right, Key::Home]
        );
        assert_eq!(
            decode_all(&m, &[0xE0, 0x4F, 0xE0, 0x53, 0xE0, 0x49, 0xE0, 0x51]),
            [Key::End, Key::Delete, Key::PageUp, Key::PageDown]
        );
    }

    #[test]
    fn test_unknown_extended_byte_consumes_prefix() {
        let m = SharedModifiers::new();
        // Keypad enter: E0 1C.
        assert!(decode_all(&m, &[0xE0, 0x1C]).is_empty());
        assert!(!m.get().contains(Modifiers::EXTENDED));
        assert_eq!(m.decode(0x1C), Some(Key::Newline));
    }

    #[test]
    fn test_extended_release_is_swallowed() {
        let m = SharedModifiers::new();
        m.decode(CTRL);
        // Right ctrl release (E0 9D) does not touch the left ctrl flag.
        assert!(decode_all(&m, &[0xE0, CTRL | RELEASE_BIT]).is_empty());
        assert!(m.ctrl_held());
        assert!(!m.get().contains(Modifiers::EXTENDED));

        m.decode(CTRL | RELEASE_BIT);
        assert!(!m.ctrl_held());
    }

    #[test]
    fn test_caps_lock_flips_letters_only() {
        let m = SharedModifiers::new();
        m.decode(CAPS_LOCK);
        m.decode(CAPS_LOCK | RELEASE_BIT);
        assert!(m.get().contains(Modifiers::CAPS_LOCK));

        assert_eq!(m.decode(0x1E), Some(Key::Char(b'A')));
        assert_eq!(m.decode(0x02), Some(Key::Char(b'1')));
        assert_eq!(m.decode(0x1A), Some(Key::Char(b'[')));

        m.decode(RIGHT_SHIFT);
        assert_eq!(m.decode(0x1E), Some(Key::Char(b'a')));
        assert_eq!(m.decode(0x02), Some(Key::Char(b'!')));
        m.decode(RIGHT_SHIFT | RELEASE_BIT);

        m.decode(CAPS_LOCK);
        assert_eq!(m.decode(0x1E), Some(Key::Char(b'a')));
    }

    #[test]
    fn test_modifiers_track_press_and_release() {
        let (held, key) = decode(Modifiers::empty(), ALT);
        assert_eq!(key, None);
        assert_eq!(held, Modifiers::ALT);

        let (held, _) = decode(held, CTRL);
        assert_eq!(held, Modifiers::ALT | Modifiers::CTRL);

        let (held, _) = decode(held, ALT | RELEASE_BIT);
        assert_eq!(held, Modifiers::CTRL);
    }

    #[test]
    fn test_controls_and_unmapped_codes() {
        let m = SharedModifiers::new();
        assert_eq!(m.decode(0x1C), Some(Key::Newline));
        assert_eq!(m.decode(0x0E), Some(Key::Backspace));
        assert_eq!(m.decode(0x39), Some(Key::Char(b' ')));
        // Tab and escape are in the keymap but are not line-editor keys.
        assert_eq!(m.decode(0x0F), None);
        assert_eq!(m.decode(0x01), None);
        // F12 lies past the end of the table.
        assert_eq!(m.decode(0x58), None);
        // Releases never produce keys.
        assert_eq!(m.decode(0x1E | RELEASE_BIT), None);
    }

    #[test]
    fn test_reset_clears_everything() {
        let m = SharedModifiers::new();
        decode_all(&m, &[LEFT_SHIFT, CTRL, CAPS_LOCK, 0xE0]);
        assert!(!m.get().is_empty());
        m.reset();
        assert!(m.get().is_empty());
    }
}
