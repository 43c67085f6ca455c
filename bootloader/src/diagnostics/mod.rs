//! Fatal-path reporting
//!
//! A failure is reported once on the firmware console and the processor is
//! halted. There is no retry and no way back.

use crate::boot_stage::BootContext;
use crate::error::BootError;
use crate::firmware::Firmware;

/// Record HALTED, print the error's diagnostic line and stop.
pub fn halt_with<F: Firmware + ?Sized>(ctx: &mut BootContext, fw: &mut F, error: &BootError) -> ! {
    log::error!("{} during {}", error, ctx.phase().name());

    if !ctx.state.is_halted() {
        if let Err(e) = ctx.state.halt() {
            log::warn!("{}", e);
        }
    }

    fw.print(error.diagnostic());
    fw.halt()
}

/// Panic report for the stage binaries: `Stage-2: panic at file:line`.
pub fn halt_on_panic<F: Firmware + ?Sized>(fw: &mut F, stage: &str, location: Option<(&str, u32)>) -> ! {
    fw.print(stage);
    fw.print(": panic");
    if let Some((file, line)) = location {
        fw.print(" at ");
        fw.print(file);
        fw.print(":");
        fw.print(itoa::Buffer::new().format(line));
    }
    fw.print("\r\n");
    fw.halt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot_stage::{BootConfig, BootPhase};
    use crate::firmware::{DiskReadRequest, DiskResult};
    use std::panic::{self, AssertUnwindSafe};

    #[derive(Default)]
    struct Console {
        output: String,
        prints: usize,
    }

    struct Halted;

    impl Firmware for Console {
        fn print(&mut self, message: &str) {
            self.output.push_str(message);
            self.prints += 1;
        }

        fn read_sectors(&mut self, _request: &DiskReadRequest) -> DiskResult<()> {
            Ok(())
        }

        fn halt(&mut self) -> ! {
            panic::panic_any(Halted)
        }
    }

    #[test]
    fn test_halt_with_prints_once_and_halts() {
        let mut ctx = BootContext::new(BootConfig::DEFAULT, 0x80);
        let mut fw = Console::default();
        let error = BootError::ConfigurationError("bad");

        let result = panic::catch_unwind(AssertUnwindSafe(|| halt_with(&mut ctx, &mut fw, &error)));

        assert!(result.unwrap_err().is::<Halted>());
        assert_eq!(fw.prints, 1);
        assert_eq!(fw.output, "Stage-2: bad boot configuration\r\n");
        assert_eq!(ctx.phase(), BootPhase::Halted);
    }

    #[test]
    fn test_halt_with_when_already_halted() {
        let mut ctx = BootContext::new(BootConfig::DEFAULT, 0x80);
        ctx.state.halt().unwrap();
        let mut fw = Console::default();
        let error = BootError::ConfigurationError("bad");

        let result = panic::catch_unwind(AssertUnwindSafe(|| halt_with(&mut ctx, &mut fw, &error)));

        assert!(result.unwrap_err().is::<Halted>());
        assert_eq!(fw.prints, 1);
        assert_eq!(ctx.phase(), BootPhase::Halted);
    }

    #[test]
    fn test_panic_report_includes_line() {
        let mut fw = Console::default();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            halt_on_panic(&mut fw, "Stage-2", Some(("src/lib.rs", 42)))
        }));

        assert!(result.is_err());
        assert_eq!(fw.output, "Stage-2: panic at src/lib.rs:42\r\n");
    }
}
