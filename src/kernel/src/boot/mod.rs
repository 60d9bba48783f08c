//! Boot progress lines with colored status brackets.

pub mod banner;

use crate::arch::x86_64::vga::{self, Color};
use crate::println;

/// Outcome shown in front of a boot step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `[ OK ]` in green
    Ok,
    /// `[FAIL]` in red
    Fail,
    /// `[WARN]` in yellow
    Warn,
}

impl Status {
    fn tag(self) -> (&'static str, Color) {
        match self {
            Status::Ok => ("[ OK ]", Color::LightGreen),
            Status::Fail => ("[FAIL]", Color::LightRed),
            Status::Warn => ("[WARN]", Color::Yellow),
        }
    }
}

/// Prints `[ OK ] message` on the screen.
pub fn report(status: Status, message: &str) {
    let (tag, color) = status.tag();
    vga::write_color(tag, color, Color::Black);
    println!(" {}", message);
}

/// Reports the result of a fallible boot step and passes it through.
pub fn step<T, E: core::fmt::Debug>(message: &str, result: Result<T, E>) -> Result<T, E> {
    match &result {
        Ok(_) => report(Status::Ok, message),
        Err(err) => {
            report(Status::Fail, message);
            log::error!("boot: {} failed: {:?}", message, err);
        }
    }
    result
}
