//! Support for the primary and secondary 8259 Programmable Interrupt Controllers (PICs).

use myos_hal::InterruptController;
use pic8259::ChainedPics;
use spin::Mutex;

/// The offset of the first PIC (master).
///
/// IRQs 0..7 are mapped to interrupts 32..39.
pub const PIC_1_OFFSET: u8 = 32;

/// The offset of the second PIC (slave).
///
/// IRQs 8..15 are mapped to interrupts 40..47.
pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

/// The global instance of the chained PICs.
pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

/// Legacy IRQ lines used by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Irq {
    /// Programmable interval timer.
    Timer = 0,
    /// PS/2 keyboard.
    Keyboard = 1,
}

impl Irq {
    /// IRQ line number.
    pub fn line(self) -> u8 {
        self as u8
    }
}

/// Initializes both PICs, remapping IRQs above the CPU exceptions.
pub fn init() {
    // SAFETY: the offsets do not overlap the CPU exception vectors.
    unsafe { PICS.lock().initialize() };
}

/// The chained PICs as seen by the IRQ table.
pub struct Pic;

impl InterruptController for Pic {
    fn enable(&mut self) {
        x86_64::instructions::interrupts::enable();
    }

    fn disable(&mut self) {
        x86_64::instructions::interrupts::disable();
    }

    fn end_of_interrupt(&mut self, irq: u8) {
        // SAFETY: called once per delivered interrupt, after its handler.
        unsafe { PICS.lock().notify_end_of_interrupt(PIC_1_OFFSET + irq) };
    }
}
