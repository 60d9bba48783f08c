//! Serial port driver for x86_64.
//!
//! COM1 (0x3F8) carries the kernel log and test output.

use core::fmt::{self, Write};
use spin::Mutex;
use uart_16550::SerialPort;

/// COM1 I/O port address.
const COM1_PORT: u16 = 0x3F8;

/// Global serial port instance, lazily initialized.
pub static SERIAL: spin::Once<Mutex<SerialPort>> = spin::Once::new();

/// Initializes the global serial port. Idempotent.
pub fn init() {
    get_serial();
}

fn get_serial() -> &'static Mutex<SerialPort> {
    SERIAL.call_once(|| {
        // SAFETY: COM1_PORT (0x3F8) is a well-known x86 serial port address.
        // We're running in kernel mode with full I/O port access.
        let mut serial = unsafe { SerialPort::new(COM1_PORT) };
        serial.init();
        Mutex::new(serial)
    })
}

/// Prints to the serial port without a newline.
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::serial::_print(format_args!($($arg)*))
    };
}

/// Prints to the serial port with a newline.
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($($arg:tt)*) => ($crate::serial_print!("{}\n", format_args!($($arg)*)))
}

/// Internal print function used by macros.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    x86_64::instructions::interrupts::without_interrupts(|| {
        // The UART write loop cannot fail.
        let _ = get_serial().lock().write_fmt(args);
    });
}

/// Releases the serial lock held by an interrupted context.
///
/// # Safety
///
/// Only for the panic path, after which the interrupted holder never runs
/// again.
pub unsafe fn force_unlock() {
    if let Some(serial) = SERIAL.get() {
        // SAFETY: upheld by the caller.
        unsafe { serial.force_unlock() }
    }
}
