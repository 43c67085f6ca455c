//! Firmware abstraction
//!
//! Stage-2 consumes three firmware primitives (print, chunked LBA read,
//! halt) plus an optional environment probe. The BIOS implementation lives
//! in `crate::bios`; tests provide their own.

use core::fmt::Write;

use arrayvec::ArrayString;
use bitflags::bitflags;
use tbds::ConsoleInfo;

pub mod disk_reader;

pub use disk_reader::{load_payload, DiskError, DiskReadRequest, DiskResult, LoadProgress, ReadPlan};

/// Synchronous firmware services used by Stage-2
pub trait Firmware {
    /// Show a message on the firmware console
    fn print(&mut self, message: &str);

    /// Read `request.sector_count` sectors into `request.destination`
    fn read_sectors(&mut self, request: &DiskReadRequest) -> DiskResult<()>;

    /// Stop the processor for good
    fn halt(&mut self) -> !;

    /// Describe what the firmware offers for `drive`
    fn probe(&mut self, drive: u8) -> FirmwareEnvironment {
        let _ = drive;
        FirmwareEnvironment::default()
    }
}

bitflags! {
    /// Interface support bitmap returned in CX by INT 13h AH=41h
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EddInterfaces: u16 {
        /// Extended read/write/verify through a disk address packet
        const PACKET_ACCESS = 1 << 0;
        const DRIVE_LOCKING = 1 << 1;
        const ENHANCED_DISK_DRIVE = 1 << 2;
        const EXTENSIONS_64BIT = 1 << 3;
    }
}

/// BIOS Enhanced Disk Drive extensions, as reported by the presence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EddSupport {
    /// Major version byte from AH
    pub version: u8,
    pub interfaces: EddInterfaces,
}

impl EddSupport {
    pub fn version_str(&self) -> &'static str {
        match self.version {
            0x01 => "1.x",
            0x20 => "2.0",
            0x21 => "1.1",
            0x30 => "3.0",
            _ => "?",
        }
    }

    pub fn has_packet_access(&self) -> bool {
        self.interfaces.contains(EddInterfaces::PACKET_ACCESS)
    }
}

/// Maximum length of the firmware identification string
pub const FIRMWARE_IDENT_CAPACITY: usize = 32;

/// What the firmware told us about the boot environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirmwareEnvironment {
    pub edd: Option<EddSupport>,
    pub console: ConsoleInfo,
    pub serial_present: bool,
}

impl FirmwareEnvironment {
    pub fn lba_extensions(&self) -> bool {
        self.edd.is_some_and(|edd| edd.has_packet_access())
    }

    /// Short identification string for the firmware descriptor,
    /// e.g. `PC-BIOS EDD 3.0`
    pub fn ident(&self) -> ArrayString<FIRMWARE_IDENT_CAPACITY> {
        let mut ident = ArrayString::new();
        ident.push_str("PC-BIOS");
        if let Some(edd) = self.edd {
            // "PC-BIOS EDD x.y" is far below the capacity
            let _ = write!(ident, " EDD {}", edd.version_str());
        }
        ident
    }
}
