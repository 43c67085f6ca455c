// A20 gate through the "fast A20" system control port

use crate::cpu_init::PortIo;

/// System control port A
pub const FAST_A20_PORT: u16 = 0x92;

const A20_ENABLE: u8 = 1 << 1;
/// Writing 1 here resets the machine
const FAST_RESET: u8 = 1 << 0;

pub fn is_enabled<P: PortIo + ?Sized>(io: &mut P) -> bool {
    io.read_port(FAST_A20_PORT) & A20_ENABLE != 0
}

/// Open the A20 gate. Idempotent: the port is only written when the gate
/// is closed, and the reset bit is always written back as zero.
///
/// Returns whether a write was needed.
pub fn enable<P: PortIo + ?Sized>(io: &mut P) -> bool {
    let value = io.read_port(FAST_A20_PORT);
    if value & A20_ENABLE != 0 {
        log::debug!("A20 already enabled");
        return false;
    }

    io.write_port(FAST_A20_PORT, (value | A20_ENABLE) & !FAST_RESET);
    log::debug!("A20 enabled via port {:#x}", FAST_A20_PORT);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu_init::MockPortIo;
    use mockall::predicate::eq;

    /// Port 0x92 that remembers what was written
    struct Port92(u8);

    impl PortIo for Port92 {
        fn read_port(&mut self, port: u16) -> u8 {
            assert_eq!(port, FAST_A20_PORT);
            self.0
        }

        fn write_port(&mut self, port: u16, value: u8) {
            assert_eq!(port, FAST_A20_PORT);
            self.0 = value;
        }
    }

    #[test]
    fn test_enable_twice_matches_enable_once() {
        let mut once = Port92(0x00);
        enable(&mut once);

        let mut twice = Port92(0x00);
        enable(&mut twice);
        enable(&mut twice);

        assert_eq!(once.0, twice.0);
        assert!(is_enabled(&mut twice));
    }

    #[test]
    fn test_enable_keeps_other_bits_and_clears_reset() {
        let mut port = Port92(0b1010_0001);
        assert!(enable(&mut port));
        assert_eq!(port.0, 0b1010_0010);
    }

    #[test]
    fn test_no_write_when_already_enabled() {
        let mut io = MockPortIo::new();
        io.expect_read_port()
            .with(eq(FAST_A20_PORT))
            .times(2)
            .return_const(A20_ENABLE);
        io.expect_write_port().never();

        assert!(!enable(&mut io));
        assert!(!enable(&mut io));
    }

    #[test]
    fn test_single_write_when_disabled() {
        let mut io = MockPortIo::new();
        io.expect_read_port()
            .with(eq(FAST_A20_PORT))
            .times(1)
            .return_const(0x00u8);
        io.expect_write_port()
            .with(eq(FAST_A20_PORT), eq(A20_ENABLE))
            .times(1)
            .return_const(());

        assert!(enable(&mut io));
    }
}
