//! MyOS interactive text-terminal core.
//!
//! Turns raw PS/2 scancodes into an edited, history-aware command line and
//! renders character output to an 80x25 cell surface with scrollback.
//!
//! # Architecture
//!
//! Leaves first:
//! - `key`: the byte-sized key events produced by the decoder
//! - `scancode`: Set-1 scancode decoding and modifier state
//! - `queue`: lock-free single-producer/single-consumer key queue
//! - `color`: VGA colors, cell styles and the packed hardware encoding
//! - `scrollback`: bounded ring of retired rows plus per-row line lengths
//! - `screen`: the live grid, its hardware mirror and scrollback paging
//! - `history`: the shell's command history ring
//! - `editor`: the line editor driving all of the above
//! - `input`: the keyboard state shared between the IRQ handler and readers
//!
//! Everything here is platform independent; hardware is reached only
//! through the `myos-hal` traits.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod color;
pub mod editor;
pub mod history;
pub mod input;
pub mod key;
pub mod queue;
pub mod scancode;
pub mod screen;
pub mod scrollback;

#[cfg(test)]
mod testutil;

pub use color::{Cell, Color, Style};
pub use editor::{read_line, read_line_plain, KeySource};
pub use history::History;
pub use input::{KeyReader, KeyboardState};
pub use key::Key;
pub use queue::KeyQueue;
pub use scancode::{Modifiers, SharedModifiers};
pub use screen::Screen;

/// Number of columns on the screen.
pub const SCREEN_WIDTH: usize = 80;

/// Number of rows on the screen.
pub const SCREEN_HEIGHT: usize = 25;

/// Number of retired rows kept for scrollback.
pub const SCROLLBACK_LINES: usize = 200;

/// Slots in the key event queue. One slot is always kept free.
pub const KEY_QUEUE_CAPACITY: usize = 256;

/// Number of commands remembered by the history ring.
pub const HISTORY_SIZE: usize = 20;

/// Maximum input line length, terminator included.
pub const MAX_LINE_LENGTH: usize = 256;

/// Tab stops are placed every `TAB_WIDTH` columns.
pub const TAB_WIDTH: usize = 4;
