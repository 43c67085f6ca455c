//! Bootloader error handling
//!
//! Every failure inside Stage-2 is a `BootError`. Errors propagate with `?`
//! up to `boot_flow::run`, which hands them to `diagnostics::halt_with`;
//! nothing is retried.

use core::fmt;

use tbds::TbdsError;

use crate::boot_stage::BootPhase;
use crate::firmware::DiskError;

/// Bootloader error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// Firmware reported a failed sector read
    DiskRead {
        lba: u32,
        sectors: u16,
        status: DiskError,
    },

    /// The descriptor block could not be built
    DescriptorBlock(TbdsError),

    /// A boot step ran out of order
    InvalidTransition { from: BootPhase, to: BootPhase },

    /// Boot configuration is unusable
    ConfigurationError(&'static str),
}

impl BootError {
    /// Convert to an error code suitable for logging
    pub fn as_error_code(&self) -> u32 {
        match self {
            BootError::DiskRead { status, .. } => 0x5000 + status.code() as u32,
            BootError::DescriptorBlock(_) => 0x6000,
            BootError::InvalidTransition { to, .. } => 0xE000 + *to as u32,
            BootError::ConfigurationError(_) => 0xA001,
        }
    }

    /// Get a human-readable description of the error
    pub fn description(&self) -> &'static str {
        match self {
            BootError::DiskRead { status, .. } => status.description(),
            BootError::DescriptorBlock(error) => error.description(),
            BootError::InvalidTransition { .. } => "Boot step out of order",
            BootError::ConfigurationError(msg) => msg,
        }
    }

    /// The single line shown on screen before halting
    pub fn diagnostic(&self) -> &'static str {
        match self {
            BootError::DiskRead { .. } => "Stage-2: disk read error\r\n",
            BootError::DescriptorBlock(_) => "Stage-2: descriptor block error\r\n",
            BootError::InvalidTransition { .. } => "Stage-2: boot sequence error\r\n",
            BootError::ConfigurationError(_) => "Stage-2: bad boot configuration\r\n",
        }
    }
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootError::DiskRead { lba, sectors, .. } => write!(
                f,
                "BootError: {} at LBA {} ({} sectors) (code: {:#x})",
                self.description(),
                lba,
                sectors,
                self.as_error_code()
            ),
            BootError::InvalidTransition { from, to } => write!(
                f,
                "BootError: {} ({} -> {}) (code: {:#x})",
                self.description(),
                from.name(),
                to.name(),
                self.as_error_code()
            ),
            _ => write!(
                f,
                "BootError: {} (code: {:#x})",
                self.description(),
                self.as_error_code()
            ),
        }
    }
}

impl From<TbdsError> for BootError {
    fn from(error: TbdsError) -> Self {
        BootError::DescriptorBlock(error)
    }
}

/// Result type used throughout the bootloader
pub type Result<T = ()> = core::result::Result<T, BootError>;
