//! Chunked disk loading
//!
//! The firmware read primitive moves a bounded number of sectors per call,
//! so the payload is read in chunks of at most `max_sectors_per_transfer`.

use crate::boot_stage::{BootConfig, BootContext, BootPhase};
use crate::error::{BootError, Result};
use crate::firmware::Firmware;
use crate::layout::SECTOR_SIZE;

/// Disk error codes (INT 13h status in AH)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskError {
    ReadFailed,
    InvalidParameters,
    AddressMarkNotFound,
    SectorNotFound,
    MediaChanged,
    DMAOverrun,
    DMABoundary,
    DataCRCError,
    ControllerError,
    SeekFailed,
    TimeoutError,
    Unknown(u8),
}

impl DiskError {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => Self::InvalidParameters,
            0x02 => Self::AddressMarkNotFound,
            0x04 => Self::SectorNotFound,
            0x06 => Self::MediaChanged,
            0x08 => Self::DMAOverrun,
            0x09 => Self::DMABoundary,
            0x10 => Self::DataCRCError,
            0x20 => Self::ControllerError,
            0x40 => Self::SeekFailed,
            0x80 => Self::TimeoutError,
            0xFF => Self::ReadFailed,
            other => Self::Unknown(other),
        }
    }

    /// Status byte this error was decoded from
    pub fn code(&self) -> u8 {
        match self {
            Self::InvalidParameters => 0x01,
            Self::AddressMarkNotFound => 0x02,
            Self::SectorNotFound => 0x04,
            Self::MediaChanged => 0x06,
            Self::DMAOverrun => 0x08,
            Self::DMABoundary => 0x09,
            Self::DataCRCError => 0x10,
            Self::ControllerError => 0x20,
            Self::SeekFailed => 0x40,
            Self::TimeoutError => 0x80,
            Self::ReadFailed => 0xFF,
            Self::Unknown(code) => *code,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ReadFailed => "Read failed",
            Self::InvalidParameters => "Invalid parameters",
            Self::AddressMarkNotFound => "Address mark not found",
            Self::SectorNotFound => "Sector not found",
            Self::MediaChanged => "Media changed",
            Self::DMAOverrun => "DMA overrun",
            Self::DMABoundary => "DMA crossed 64K boundary",
            Self::DataCRCError => "Data CRC error",
            Self::ControllerError => "Controller error",
            Self::SeekFailed => "Seek failed",
            Self::TimeoutError => "Timeout error",
            Self::Unknown(_) => "Unknown error",
        }
    }
}

pub type DiskResult<T> = core::result::Result<T, DiskError>;

/// One firmware read call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskReadRequest {
    pub drive: u8,
    pub lba: u32,
    pub sector_count: u16,
    /// Linear physical address, below 1 MiB
    pub destination: u32,
}

impl DiskReadRequest {
    pub fn new(drive: u8, lba: u32, sector_count: u16, destination: u32) -> Self {
        Self {
            drive,
            lba,
            sector_count,
            destination,
        }
    }

    /// Get size in bytes
    pub fn size_bytes(&self) -> u32 {
        self.sector_count as u32 * SECTOR_SIZE
    }
}

/// Where the chunked load stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub remaining: u32,
    pub current_lba: u32,
    pub destination: u32,
}

impl LoadProgress {
    pub const fn new(lba: u32, sectors: u32, destination: u32) -> Self {
        Self {
            remaining: sectors,
            current_lba: lba,
            destination,
        }
    }

    pub fn for_payload(config: &BootConfig) -> Self {
        Self::new(
            config.payload_lba,
            config.payload_sectors,
            config.payload_address,
        )
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// The next read, `min(remaining, max)` sectors at the current position.
    /// `None` once done, or if `max` is zero.
    pub fn next_request(&self, drive: u8, max: u16) -> Option<DiskReadRequest> {
        if self.remaining == 0 || max == 0 {
            return None;
        }

        let chunk = self.remaining.min(max as u32) as u16;
        Some(DiskReadRequest::new(
            drive,
            self.current_lba,
            chunk,
            self.destination,
        ))
    }

    /// Account for a read that succeeded
    pub fn commit(&mut self, request: &DiskReadRequest) {
        let sectors = request.sector_count as u32;
        self.current_lba += sectors;
        self.destination += request.size_bytes();
        self.remaining -= sectors;
    }
}

/// Every read a load would issue, assuming each one succeeds
#[derive(Debug, Clone)]
pub struct ReadPlan {
    progress: LoadProgress,
    drive: u8,
    max: u16,
}

impl ReadPlan {
    pub fn new(progress: LoadProgress, drive: u8, max: u16) -> Self {
        Self {
            progress,
            drive,
            max,
        }
    }

    pub fn for_payload(config: &BootConfig, drive: u8) -> Self {
        Self::new(
            LoadProgress::for_payload(config),
            drive,
            config.max_sectors_per_transfer,
        )
    }
}

impl Iterator for ReadPlan {
    type Item = DiskReadRequest;

    fn next(&mut self) -> Option<Self::Item> {
        let request = self.progress.next_request(self.drive, self.max)?;
        self.progress.commit(&request);
        Some(request)
    }
}

/// Read the whole payload, stopping at the first failed transfer.
///
/// A partially loaded payload cannot be executed, so a failure leaves the
/// progress where it was and is returned to the caller as fatal.
pub fn load_payload<F: Firmware + ?Sized>(ctx: &mut BootContext, fw: &mut F) -> Result {
    ctx.state.expect(BootPhase::Stage2Loaded)?;

    let max = ctx.config.max_sectors_per_transfer;
    if max == 0 {
        return Err(BootError::ConfigurationError("zero sectors per transfer"));
    }

    log::info!(
        "loading {} sectors from LBA {} to {:#x}",
        ctx.progress.remaining,
        ctx.progress.current_lba,
        ctx.progress.destination
    );

    while let Some(request) = ctx.progress.next_request(ctx.boot_drive, max) {
        log::debug!(
            "read LBA {} x{} -> {:#x}",
            request.lba,
            request.sector_count,
            request.destination
        );

        fw.read_sectors(&request)
            .map_err(|status| BootError::DiskRead {
                lba: request.lba,
                sectors: request.sector_count,
                status,
            })?;

        ctx.progress.commit(&request);
    }

    ctx.state.advance(BootPhase::PayloadLoaded)
}
