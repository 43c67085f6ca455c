// 16550 UART driver over port I/O

use core::fmt;

use crate::cpu_init::PortIo;

/// I/O base of the first serial port
pub const COM1: u16 = 0x3F8;

const DATA: u16 = 0;
const INTERRUPT_ENABLE: u16 = 1;
const FIFO_CONTROL: u16 = 2;
const LINE_CONTROL: u16 = 3;
const MODEM_CONTROL: u16 = 4;
const LINE_STATUS: u16 = 5;

const LCR_DLAB: u8 = 0x80;
const LCR_8N1: u8 = 0x03;
const LSR_THR_EMPTY: u8 = 0x20;

/// 115200 / 3 = 38400 baud
const DIVISOR: u16 = 3;

/// Polls before a byte is written regardless of the line status
const TX_SPIN_LIMIT: u32 = 100_000;

pub struct SerialPort<P: PortIo> {
    io: P,
    base: u16,
}

impl<P: PortIo> SerialPort<P> {
    pub const fn new(io: P, base: u16) -> Self {
        Self { io, base }
    }

    /// 8N1 at 38400 baud, FIFOs on, interrupts off
    pub fn init(&mut self) {
        self.io.write_port(self.base + INTERRUPT_ENABLE, 0x00);
        self.io.write_port(self.base + LINE_CONTROL, LCR_DLAB);
        self.io.write_port(self.base + DATA, (DIVISOR & 0xFF) as u8);
        self.io.write_port(self.base + INTERRUPT_ENABLE, (DIVISOR >> 8) as u8);
        self.io.write_port(self.base + LINE_CONTROL, LCR_8N1);
        self.io.write_port(self.base + FIFO_CONTROL, 0xC7);
        self.io.write_port(self.base + MODEM_CONTROL, 0x0B);
    }

    pub fn write_byte(&mut self, byte: u8) {
        let mut spins = 0;
        while self.io.read_port(self.base + LINE_STATUS) & LSR_THR_EMPTY == 0 && spins < TX_SPIN_LIMIT {
            spins += 1;
            core::hint::spin_loop();
        }
        self.io.write_port(self.base + DATA, byte);
    }

    pub fn io(&self) -> &P {
        &self.io
    }
}

impl<P: PortIo> fmt::Write for SerialPort<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}
