//! Programmable interval timer tick counter.
//!
//! The PIT is left at its power-on rate, roughly 18.2 Hz.

use crate::arch::x86_64::interrupts;
use crate::arch::x86_64::pic::Irq;
use core::sync::atomic::{AtomicU64, Ordering};
use myos_common::IrqError;
use myos_hal::Timer;

/// Default PIT frequency in millihertz.
pub const TICK_RATE_MHZ: u64 = 18_206;

static TICKS: AtomicU64 = AtomicU64::new(0);

fn on_irq(_irq: u8) {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

/// Registers the IRQ0 handler.
pub fn init() -> Result<(), IrqError> {
    interrupts::install_handler(Irq::Timer.line(), &on_irq)?;
    log::debug!("timer: PIT ticking on IRQ{}", Irq::Timer.line());
    Ok(())
}

/// Ticks since [`init`].
pub fn ticks() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

/// Whole seconds elapsed on `timer`.
pub fn uptime_secs<T: Timer + ?Sized>(timer: &T) -> u64 {
    timer.current_ticks() * 1000 / TICK_RATE_MHZ
}

/// Halts until `secs` seconds have passed on `timer`.
///
/// Needs interrupts enabled, or it never returns.
pub fn sleep_secs<T: Timer + ?Sized>(timer: &T, secs: u64) {
    let target = timer.current_ticks() + (secs * TICK_RATE_MHZ).div_ceil(1000);
    while timer.current_ticks() < target {
        x86_64::instructions::hlt();
    }
}

/// The PIT as a [`Timer`].
pub struct Pit;

impl Timer for Pit {
    fn current_ticks(&self) -> u64 {
        ticks()
    }
}
