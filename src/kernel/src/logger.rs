//! Kernel log sink.
//!
//! Routes the `log` facade to COM1, one line per record:
//! `[LEVEL] target: message`. The screen is left to the shell.

use crate::serial_println;
use log::{LevelFilter, Log, Metadata, Record};

struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            serial_println!("[{:<5}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Default maximum level: `Debug` in debug builds, `Info` otherwise.
pub const fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the serial logger. Later calls only change the level.
pub fn init(level: LevelFilter) {
    // Only the first call can install; the error just means it already is.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
