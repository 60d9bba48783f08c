//! VGA text mode driver for x86_64.
//!
//! The terminal [`Screen`] draws into the VGA text buffer at 0xB8000 through
//! [`VgaBuffer`]. All kernel text output goes through the global [`SCREEN`].

use core::fmt::{self, Write};
use core::ptr;
use myos_console::{Screen, SCREEN_HEIGHT, SCREEN_WIDTH};
use myos_hal::TextBuffer;
use spin::Mutex;

pub use myos_console::Color;

/// VGA text buffer memory-mapped I/O address.
const VGA_BUFFER_ADDR: usize = 0xB8000;

const CELLS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// The VGA text buffer as a [`TextBuffer`].
pub struct VgaBuffer {
    /// SAFETY: This pointer is valid for the lifetime of the kernel.
    /// The VGA buffer at 0xB8000 is always mapped in x86 real/protected mode.
    cells: *mut u16,
}

// SAFETY: VgaBuffer only accesses the VGA buffer through volatile operations.
// The buffer is memory-mapped hardware that exists for the kernel's lifetime.
// Access is synchronized through the SCREEN spinlock.
unsafe impl Send for VgaBuffer {}

impl VgaBuffer {
    fn new() -> Self {
        VgaBuffer {
            cells: VGA_BUFFER_ADDR as *mut u16,
        }
    }
}

impl TextBuffer for VgaBuffer {
    fn write_cell(&mut self, index: usize, value: u16) {
        debug_assert!(index < CELLS, "cell index out of bounds");
        if index < CELLS {
            // SAFETY: index is inside the 80x25 buffer. Using volatile write
            // because the VGA buffer is memory-mapped I/O.
            unsafe { ptr::write_volatile(self.cells.add(index), value) }
        }
    }

    fn read_cell(&self, index: usize) -> u16 {
        if index < CELLS {
            // SAFETY: as in write_cell.
            unsafe { ptr::read_volatile(self.cells.add(index)) }
        } else {
            0
        }
    }
}

/// Global screen instance.
///
/// Uses a spinlock for safe concurrent access.
pub static SCREEN: spin::Once<Mutex<Screen<VgaBuffer>>> = spin::Once::new();

/// Initializes the global screen and clears it.
///
/// Idempotent - safe to call multiple times.
pub fn init() {
    screen();
}

/// Returns a reference to the screen, initializing if necessary.
pub fn screen() -> &'static Mutex<Screen<VgaBuffer>> {
    SCREEN.call_once(|| {
        let mut screen = Screen::new(VgaBuffer::new());
        screen.clear();
        Mutex::new(screen)
    })
}

/// Prints to the VGA buffer without a newline.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::vga::_print(format_args!($($arg)*))
    };
}

/// Prints to the VGA buffer with a newline.
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)))
}

/// Internal print function used by macros.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    x86_64::instructions::interrupts::without_interrupts(|| {
        // Screen::write_str never fails.
        let _ = screen().lock().write_fmt(args);
    });
}

/// Prints unless the screen is locked, e.g. by an interrupted reader.
///
/// For exception handlers that return. Returns false if nothing was
/// written, so the caller can fall back to serial.
pub fn try_print(args: fmt::Arguments) -> bool {
    x86_64::instructions::interrupts::without_interrupts(|| {
        match SCREEN.get().and_then(|screen| screen.try_lock()) {
            Some(mut screen) => {
                let _ = screen.write_fmt(args);
                true
            }
            None => false,
        }
    })
}

/// Sets the VGA output color.
pub fn set_color(foreground: Color, background: Color) {
    screen().lock().set_color(foreground, background);
}

/// Writes `text` in the given colors without changing the current ones.
pub fn write_color(text: &str, foreground: Color, background: Color) {
    screen().lock().write_color(text, foreground, background);
}

/// Clears the VGA screen.
pub fn clear_screen() {
    screen().lock().clear();
}

/// Releases the screen lock held by an interrupted context.
///
/// # Safety
///
/// Only for the panic path, after which the interrupted holder never runs
/// again.
pub unsafe fn force_unlock() {
    if let Some(screen) = SCREEN.get() {
        // SAFETY: upheld by the caller.
        unsafe { screen.force_unlock() }
    }
}
