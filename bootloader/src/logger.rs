//! Serial logger
//!
//! `log` backend writing `[LEVEL] message` lines to a 16550 UART. The
//! screen is left to the firmware print primitive.

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::cpu_init::PortIo;
use crate::drivers::SerialPort;

#[cfg(feature = "verbose_logging")]
pub const LEVEL: LevelFilter = LevelFilter::Debug;
#[cfg(not(feature = "verbose_logging"))]
pub const LEVEL: LevelFilter = LevelFilter::Info;

pub struct SerialLogger<P: PortIo + Send> {
    port: Mutex<SerialPort<P>>,
    level: LevelFilter,
}

impl<P: PortIo + Send> SerialLogger<P> {
    pub const fn new(port: SerialPort<P>, level: LevelFilter) -> Self {
        Self {
            port: Mutex::new(port),
            level,
        }
    }

    pub fn init_port(&self) {
        self.port.lock().init();
    }

    pub fn with_port<R>(&self, f: impl FnOnce(&SerialPort<P>) -> R) -> R {
        f(&self.port.lock())
    }
}

impl<P: PortIo + Send> Log for SerialLogger<P> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut port = self.port.lock();
        let _ = writeln!(port, "[{:<5}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

#[cfg(all(target_arch = "x86", target_os = "none"))]
static LOGGER: SerialLogger<crate::arch::X86Cpu> =
    SerialLogger::new(SerialPort::new(crate::arch::X86Cpu, crate::drivers::COM1), LEVEL);

/// Install the COM1 logger. Safe to call once; later calls are ignored.
#[cfg(all(target_arch = "x86", target_os = "none"))]
pub fn init() {
    LOGGER.init_port();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LEVEL);
    }
}
