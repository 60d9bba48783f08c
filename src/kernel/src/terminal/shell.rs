//! Prompt loop.

use super::Command;
use crate::arch::x86_64::keyboard;
use crate::arch::x86_64::vga::{self, Color};
use myos_console::{read_line, History, MAX_LINE_LENGTH};

/// The prompt printed before each line.
pub const PROMPT: &str = "> ";

/// Reads, records and runs commands.
pub struct Shell {
    history: History,
}

impl Shell {
    /// Creates a shell with empty history.
    pub fn new() -> Self {
        Shell {
            history: History::new(),
        }
    }

    /// Commands entered so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Prints the prompt.
    pub fn prompt(&self) {
        vga::write_color(PROMPT, Color::LightCyan, Color::Black);
    }

    /// Reads one edited line from the keyboard.
    ///
    /// The screen stays locked for the whole read; keyboard and timer
    /// interrupts never touch it.
    pub fn read(&self) -> alloc::string::String {
        let mut keys = keyboard::reader();
        let mut screen = vga::screen().lock();
        read_line(&mut *screen, &mut keys, MAX_LINE_LENGTH, &self.history)
    }

    /// Records a non-empty line, then runs it.
    ///
    /// A line of only spaces is recorded but runs nothing.
    pub fn submit(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        self.history.push(line);
        if let Some(command) = Command::parse(line) {
            command.execute(self);
        }
    }

    /// Runs the prompt loop forever.
    pub fn run(&mut self) -> ! {
        log::info!("shell: ready");
        loop {
            self.prompt();
            let line = self.read();
            self.submit(&line);
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
