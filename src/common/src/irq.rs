//! Hardware IRQ handler table.
//!
//! One handler per legacy PIC line, keyed by IRQ number. Dispatch always
//! acknowledges the interrupt after the handler returns, whether or not a
//! handler was installed.

use crate::error::IrqError;
use myos_hal::InterruptController;

/// Number of legacy IRQ lines behind the chained 8259 PICs.
pub const IRQ_LINES: usize = 16;

/// A callback run in interrupt context.
///
/// Handlers must not block, allocate or take a lock the interrupted code
/// could be holding.
pub trait IrqHandler: Sync {
    /// Handles one interrupt on `irq`.
    fn handle(&self, irq: u8);
}

impl<F> IrqHandler for F
where
    F: Fn(u8) + Sync,
{
    fn handle(&self, irq: u8) {
        self(irq)
    }
}

/// Fixed-size table of installed IRQ handlers.
pub struct IrqTable {
    handlers: [Option<&'static dyn IrqHandler>; IRQ_LINES],
}

impl IrqTable {
    /// Creates an empty table.
    pub const fn new() -> Self {
        Self {
            handlers: [None; IRQ_LINES],
        }
    }

    /// Installs `handler` on `irq`.
    ///
    /// A line holds at most one handler; uninstall the old one first.
    pub fn install(&mut self, irq: u8, handler: &'static dyn IrqHandler) -> Result<(), IrqError> {
        let slot = self
            .handlers
            .get_mut(irq as usize)
            .ok_or(IrqError::OutOfRange(irq))?;
        if slot.is_some() {
            return Err(IrqError::AlreadyInstalled(irq));
        }
        *slot = Some(handler);
        log::debug!("irq: handler installed on line {}", irq);
        Ok(())
    }

    /// Removes the handler installed on `irq`.
    pub fn uninstall(&mut self, irq: u8) -> Result<(), IrqError> {
        let slot = self
            .handlers
            .get_mut(irq as usize)
            .ok_or(IrqError::OutOfRange(irq))?;
        slot.take().map(|_| ()).ok_or(IrqError::NotInstalled(irq))
    }

    /// Returns true if a handler is installed on `irq`.
    pub fn is_installed(&self, irq: u8) -> bool {
        matches!(self.handlers.get(irq as usize), Some(Some(_)))
    }

    /// Runs the handler for `irq`, then sends end-of-interrupt.
    ///
    /// Returns true if a handler ran. Lines outside the table are ignored
    /// and not acknowledged.
    pub fn dispatch<C: InterruptController>(&self, irq: u8, controller: &mut C) -> bool {
        let Some(slot) = self.handlers.get(irq as usize) else {
            return false;
        };
        let handled = match slot {
            Some(handler) => {
                handler.handle(irq);
                true
            }
            None => false,
        };
        controller.end_of_interrupt(irq);
        handled
    }
}

impl Default for IrqTable {
    fn default() -> Self {
        Self::new()
    }
}
