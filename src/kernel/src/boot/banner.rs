//! Boot banner.

use crate::arch::x86_64::vga::{self, Color};
use crate::println;

const LOGO: [&str; 6] = [
    r"  __  __        ___  ____  ",
    r" |  \/  |_   _ / _ \/ ___| ",
    r" | |\/| | | | | | | \___ \ ",
    r" | |  | | |_| | |_| |___) |",
    r" |_|  |_|\__, |\___/|____/ ",
    r"         |___/             ",
];

/// Prints the logo and version line.
pub fn print_banner() {
    for line in LOGO {
        vga::write_color(line, Color::Cyan, Color::Black);
        println!();
    }
    println!(" MyOS v{}", env!("CARGO_PKG_VERSION"));
    println!();
}
