use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::serial::init_serial;
use crate::serial_println;

struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let tag = match record.level() {
            Level::Error => "ERR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        serial_println!("[{}] {}", tag, record.args());
    }

    fn flush(&self) {}
}

/// Routes the `log` macros of this crate to COM1.
///
/// Call at most once; a second call reports the logger already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    init_serial();
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
