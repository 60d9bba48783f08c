//! MyOS kernel.
//!
//! Boots into an interactive shell on the VGA text console.
//!
//! # Architecture
//!
//! - `arch`: platform code (VGA, serial, descriptor tables, PICs, drivers)
//! - `logger`: the `log` sink on COM1
//! - `memory`, `allocator`: page mapping and the kernel heap
//! - `boot`: boot status lines and the banner
//! - `terminal`: the shell and its commands
//!
//! The console logic itself lives in `myos-console` and is tested on the
//! host; this crate wires it to hardware.
//!
//! # Safety
//!
//! This is a `#![no_std]` kernel. All unsafe code is documented with safety
//! invariants explaining why the usage is correct.

#![no_std]
#![feature(abi_x86_interrupt)]
#![warn(missing_docs)]

extern crate alloc;

pub mod arch;

#[cfg(target_arch = "x86_64")]
pub mod allocator;
#[cfg(target_arch = "x86_64")]
pub mod boot;
#[cfg(target_arch = "x86_64")]
pub mod logger;
#[cfg(target_arch = "x86_64")]
pub mod memory;
#[cfg(target_arch = "x86_64")]
pub mod terminal;
#[cfg(target_arch = "x86_64")]
pub mod testutil;

/// Brings up serial logging, descriptor tables, the PICs and the screen.
///
/// Interrupts are left disabled; drivers install their handlers first and
/// the caller enables them with `interrupts::enable`.
pub fn init() {
    #[cfg(target_arch = "x86_64")]
    {
        arch::x86_64::serial::init();
        logger::init(logger::default_level());
        arch::x86_64::interrupts::init();
        log::debug!("init: GDT, IDT and PICs loaded");
        arch::x86_64::vga::init();
    }
}
