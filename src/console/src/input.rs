//! Keyboard state shared between the interrupt handler and readers.
//!
//! The handler side calls [`KeyboardState::handle_scancode`]; it never
//! blocks, allocates or locks. The reader side borrows a [`KeyReader`],
//! which blocks with the supplied [`Idle`] until a key arrives.

use crate::editor::KeySource;
use crate::key::Key;
use crate::queue::KeyQueue;
use crate::scancode::{Modifiers, SharedModifiers};
use myos_hal::Idle;

/// Modifier state plus the pending key queue.
pub struct KeyboardState {
    modifiers: SharedModifiers,
    queue: KeyQueue,
}

impl KeyboardState {
    /// Creates a state with no keys pending and no modifiers held.
    pub const fn new() -> Self {
        Self {
            modifiers: SharedModifiers::new(),
            queue: KeyQueue::new(),
        }
    }

    /// Forgets modifiers and pending keys. Call with the IRQ line masked.
    pub fn reset(&self) {
        self.modifiers.reset();
        self.queue.reset();
    }

    /// Decodes one scancode and queues the resulting key, if any.
    ///
    /// Runs in interrupt context.
    pub fn handle_scancode(&self, scancode: u8) {
        if let Some(key) = self.modifiers.decode(scancode) {
            self.queue.push(key);
        }
    }

    /// Returns true if a key is waiting.
    pub fn available(&self) -> bool {
        self.queue.available()
    }

    /// Takes the next key without waiting.
    pub fn try_key(&self) -> Option<Key> {
        self.queue.pop()
    }

    /// Current modifier state.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers.get()
    }

    /// Keys lost to a full queue since the last reset.
    pub fn dropped(&self) -> usize {
        self.queue.dropped()
    }

    /// Returns the blocking reader used by the line editor.
    pub fn reader<'a, I: Idle>(&'a self, idle: &'a I) -> KeyReader<'a, I> {
        KeyReader { state: self, idle }
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking consumer handle over a [`KeyboardState`].
pub struct KeyReader<'a, I> {
    state: &'a KeyboardState,
    idle: &'a I,
}

impl<I: Idle> KeySource for KeyReader<'_, I> {
    fn next_key(&mut self) -> Key {
        self.state.queue.pop_blocking(self.idle)
    }

    fn ctrl_held(&self) -> bool {
        self.state.modifiers.ctrl_held()
    }
}
