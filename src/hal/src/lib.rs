//! MyOS Hardware Abstraction Layer (HAL) traits.
//!
//! This crate defines the narrow contracts the terminal core consumes from
//! platform code, so the core can run against real hardware or a test double.

#![no_std]

/// A memory-mapped character-cell surface, such as the VGA text buffer.
///
/// Cells are addressed linearly (`row * width + col`) and hold the packed
/// hardware encoding: character in the low byte, attribute in the high byte.
pub trait TextBuffer {
    /// Writes a packed cell. The write is immediately visible.
    fn write_cell(&mut self, index: usize, value: u16);
    /// Reads back a packed cell.
    fn read_cell(&self, index: usize) -> u16;
}

/// Trait for yielding the processor while waiting for input.
pub trait Idle {
    /// Sleeps until the next interrupt (or returns immediately when that is
    /// not possible on the platform).
    fn wait_for_interrupt(&self);
}

/// Trait for controlling interrupts.
pub trait InterruptController {
    /// Globally enables interrupts.
    fn enable(&mut self);
    /// Globally disables interrupts.
    fn disable(&mut self);
    /// Signals the end of an interrupt to the controller.
    fn end_of_interrupt(&mut self, irq: u8);
}

/// Trait for a system timer.
pub trait Timer {
    /// Returns the number of ticks since the system started.
    fn current_ticks(&self) -> u64;
}
