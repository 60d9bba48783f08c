//! x86_64 architecture support.
//!
//! VGA text output, serial port, descriptor tables, the legacy PICs and
//! the keyboard and timer drivers behind them.

pub mod gdt;
pub mod interrupts;
pub mod keyboard;
pub mod pic;
pub mod serial;
pub mod timer;
pub mod vga;

pub use serial::SERIAL;
pub use vga::{Color, VgaBuffer, SCREEN};

use myos_hal::Idle;

/// Halts the CPU until the next interrupt.
///
/// Used in idle loops to reduce power consumption.
#[inline]
pub fn hlt() {
    x86_64::instructions::hlt();
}

/// Halts the CPU in an infinite loop.
///
/// Used after unrecoverable errors (panics).
pub fn halt_loop() -> ! {
    loop {
        hlt();
    }
}

/// Waits for input with `hlt`.
pub struct Halt;

impl Idle for Halt {
    fn wait_for_interrupt(&self) {
        hlt();
    }
}

/// Resets the machine through the keyboard controller.
pub fn reboot() -> ! {
    use x86_64::instructions::port::Port;

    x86_64::instructions::interrupts::disable();
    let mut status: Port<u8> = Port::new(0x64);
    // SAFETY: 0x64 is the 8042 command port; 0xFE pulses the CPU reset line.
    unsafe {
        // Wait for the input buffer to drain.
        while status.read() & 0x02 != 0 {}
        status.write(0xFE);
    }
    halt_loop()
}
