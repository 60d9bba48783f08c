//! Types shared across MyOS kernel crates.
//!
//! - `error`: error taxonomy for fallible kernel setup
//! - `irq`: the IRQ handler table behind the interrupt dispatcher

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[cfg(test)]
extern crate alloc;

pub mod error;
pub mod irq;

pub use error::IrqError;
pub use irq::{IrqHandler, IrqTable, IRQ_LINES};
