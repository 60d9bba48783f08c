//! PS/2 keyboard driver.
//!
//! IRQ1 reads the scancode from the controller's data port and hands it to
//! the shared [`KeyboardState`]; readers drain the decoded keys from task
//! context.

use crate::arch::x86_64::interrupts;
use crate::arch::x86_64::pic::Irq;
use crate::arch::x86_64::Halt;
use myos_common::IrqError;
use myos_console::{KeyReader, KeyboardState};
use x86_64::instructions::port::Port;

/// PS/2 controller data port.
const DATA_PORT: u16 = 0x60;

/// Modifier state and key queue shared with the IRQ handler.
pub static KEYBOARD: KeyboardState = KeyboardState::new();

fn on_irq(_irq: u8) {
    let mut port: Port<u8> = Port::new(DATA_PORT);
    // SAFETY: reading 0x60 acknowledges the byte the controller latched for
    // this interrupt and has no other side effect.
    let scancode = unsafe { port.read() };
    KEYBOARD.handle_scancode(scancode);
}

/// Resets keyboard state and registers the IRQ1 handler.
pub fn init() -> Result<(), IrqError> {
    KEYBOARD.reset();
    interrupts::install_handler(Irq::Keyboard.line(), &on_irq)?;
    log::info!("keyboard: PS/2 driver on IRQ{}", Irq::Keyboard.line());
    Ok(())
}

/// Returns true if a decoded key is waiting.
pub fn available() -> bool {
    KEYBOARD.available()
}

/// A blocking key source that halts while the queue is empty.
pub fn reader() -> KeyReader<'static, Halt> {
    KEYBOARD.reader(&Halt)
}
