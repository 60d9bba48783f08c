//! Interactive shell on the VGA console.
//!
//! - `shell`: prompt, line reading and the command history
//! - `commands`: parsing and running built-in commands

pub mod commands;
pub mod shell;

pub use commands::Command;
pub use shell::Shell;
