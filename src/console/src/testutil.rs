//! Host test doubles.

use crate::editor::KeySource;
use crate::key::Key;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};
use myos_hal::{Idle, TextBuffer};
use std::collections::VecDeque;
use std::string::String;

/// In-memory stand-in for VGA text memory.
pub struct MockBuffer {
    pub cells: [u16; SCREEN_WIDTH * SCREEN_HEIGHT],
}

impl MockBuffer {
    pub const fn new() -> Self {
        Self {
            cells: [0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    /// Characters of hardware row `row`, trailing spaces trimmed.
    pub fn row_text(&self, row: usize) -> String {
        let start = row * SCREEN_WIDTH;
        let text: String = self.cells[start..start + SCREEN_WIDTH]
            .iter()
            .map(|&cell| (cell & 0xff) as u8 as char)
            .collect();
        text.trim_end().into()
    }
}

impl TextBuffer for MockBuffer {
    fn write_cell(&mut self, index: usize, value: u16) {
        self.cells[index] = value;
    }

    fn read_cell(&self, index: usize) -> u16 {
        self.cells[index]
    }
}

/// Never waits; fine whenever the queue is known to be non-empty.
pub struct NoIdle;

impl Idle for NoIdle {
    fn wait_for_interrupt(&self) {}
}

/// Replays a fixed list of keys, each with its ctrl state.
pub struct ScriptedKeys {
    keys: VecDeque<(Key, bool)>,
    ctrl: bool,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            ctrl: false,
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        for byte in text.bytes() {
            self = self.key(Key::Char(byte));
        }
        self
    }

    pub fn key(mut self, key: Key) -> Self {
        self.keys.push_back((key, false));
        self
    }

    pub fn ctrl(mut self, key: Key) -> Self {
        self.keys.push_back((key, true));
        self
    }

    pub fn enter(self) -> Self {
        self.key(Key::Newline)
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Key {
        let (key, ctrl) = self.keys.pop_front().expect("script ran out of keys");
        self.ctrl = ctrl;
        key
    }

    fn ctrl_held(&self) -> bool {
        self.ctrl
    }
}
