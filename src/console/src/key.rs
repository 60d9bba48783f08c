//! Key events.
//!
//! A key event is a single byte on the wire: printable ASCII, newline,
//! backspace, or one of nine synthetic codes above the ASCII range.

/// Synthetic code for the up arrow.
pub const KEY_UP_ARROW: u8 = 0x80;
/// Synthetic code for the down arrow.
pub const KEY_DOWN_ARROW: u8 = 0x81;
/// Synthetic code for the left arrow.
pub const KEY_LEFT_ARROW: u8 = 0x82;
/// Synthetic code for the right arrow.
pub const KEY_RIGHT_ARROW: u8 = 0x83;
/// Synthetic code for Home.
pub const KEY_HOME: u8 = 0x84;
/// Synthetic code for End.
pub const KEY_END: u8 = 0x85;
/// Synthetic code for Delete.
pub const KEY_DELETE: u8 = 0x86;
/// Synthetic code for Page Up.
pub const KEY_PAGE_UP: u8 = 0x87;
/// Synthetic code for Page Down.
pub const KEY_PAGE_DOWN: u8 = 0x88;

const BACKSPACE: u8 = 0x08;

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable ASCII character (32..=126).
    Char(u8),
    /// Enter.
    Newline,
    /// Backspace.
    Backspace,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Delete.
    Delete,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
}

impl Key {
    /// Maps an ASCII byte from the keymap to a key event.
    ///
    /// Control characters other than newline and backspace have no event.
    pub const fn from_ascii(byte: u8) -> Option<Key> {
        match byte {
            b'\n' => Some(Key::Newline),
            BACKSPACE => Some(Key::Backspace),
            0x20..=0x7e => Some(Key::Char(byte)),
            _ => None,
        }
    }

    /// Decodes the single-byte wire form.
    pub const fn from_byte(byte: u8) -> Option<Key> {
        match byte {
            KEY_UP_ARROW => Some(Key::Up),
            KEY_DOWN_ARROW => Some(Key::Down),
            KEY_LEFT_ARROW => Some(Key::Left),
            KEY_RIGHT_ARROW => Some(Key::Right),
            KEY_HOME => Some(Key::Home),
            KEY_END => Some(Key::End),
            KEY_DELETE => Some(Key::Delete),
            KEY_PAGE_UP => Some(Key::PageUp),
            KEY_PAGE_DOWN => Some(Key::PageDown),
            _ => Key::from_ascii(byte),
        }
    }

    /// Encodes the key as its single-byte wire form.
    pub const fn to_byte(self) -> u8 {
        match self {
            Key::Char(c) => c,
            Key::Newline => b'\n',
            Key::Backspace => BACKSPACE,
            Key::Up => KEY_UP_ARROW,
            Key::Down => KEY_DOWN_ARROW,
            Key::Left => KEY_LEFT_ARROW,
            Key::Right => KEY_RIGHT_ARROW,
            Key::Home => KEY_HOME,
            Key::End => KEY_END,
            Key::Delete => KEY_DELETE,
            Key::PageUp => KEY_PAGE_UP,
            Key::PageDown => KEY_PAGE_DOWN,
        }
    }
}
