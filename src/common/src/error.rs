//! System-wide error types for MyOS.

use core::fmt;

/// Interrupt registration error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IrqError {
    /// IRQ line outside the legacy PIC range
    OutOfRange(u8),
    /// A handler is already installed on this line
    AlreadyInstalled(u8),
    /// No handler is installed on this line
    NotInstalled(u8),
}

impl fmt::Display for IrqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrqError::OutOfRange(irq) => write!(f, "IRQ {} out of range", irq),
            IrqError::AlreadyInstalled(irq) => write!(f, "IRQ {} already has a handler", irq),
            IrqError::NotInstalled(irq) => write!(f, "IRQ {} has no handler", irq),
        }
    }
}
