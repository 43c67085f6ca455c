//! Boot configuration
//!
//! Runtime view of the layout constants. The Stage-2 binary always uses
//! `BootConfig::DEFAULT`; tests build their own.

use crate::error::{BootError, Result};
use crate::layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    pub stage2_lba: u32,
    pub stage2_sectors: u16,
    pub payload_lba: u32,
    pub payload_sectors: u32,
    /// Physical address the payload is read into
    pub payload_address: u32,
    pub payload_entry: u32,
    /// Largest sector count the firmware accepts in one read
    pub max_sectors_per_transfer: u16,
    pub tbds_address: u32,
    pub tbds_capacity: usize,
    pub stack_top: u32,
}

impl BootConfig {
    pub const DEFAULT: Self = Self {
        stage2_lba: layout::STAGE2_LBA,
        stage2_sectors: layout::STAGE2_SECTORS,
        payload_lba: layout::PAYLOAD_LBA,
        payload_sectors: layout::PAYLOAD_SECTORS,
        payload_address: layout::PAYLOAD_ADDR,
        payload_entry: layout::PAYLOAD_ENTRY,
        max_sectors_per_transfer: layout::MAX_SECTORS_PER_TRANSFER,
        tbds_address: layout::TBDS_ADDR,
        tbds_capacity: layout::TBDS_CAPACITY,
        stack_top: layout::PROTECTED_STACK_TOP,
    };

    /// Bytes the payload occupies once loaded
    pub fn payload_bytes(&self) -> u32 {
        self.payload_sectors * layout::SECTOR_SIZE
    }

    /// Reject configurations the loader cannot execute
    pub fn validate(&self) -> Result {
        if self.max_sectors_per_transfer == 0 {
            return Err(BootError::ConfigurationError("zero sectors per transfer"));
        }
        let transfer_bytes = self.max_sectors_per_transfer as u32 * layout::SECTOR_SIZE;
        if layout::DMA_BOUNDARY % transfer_bytes != 0 {
            return Err(BootError::ConfigurationError("transfer size does not divide 64 KiB"));
        }
        if self.payload_address % transfer_bytes != 0 {
            return Err(BootError::ConfigurationError("payload not aligned to transfer size"));
        }
        if self.payload_sectors == 0 {
            return Err(BootError::ConfigurationError("empty payload"));
        }

        let payload_end = self
            .payload_address
            .checked_add(self.payload_bytes())
            .ok_or(BootError::ConfigurationError("payload wraps address space"))?;
        if payload_end > layout::REAL_MODE_LIMIT {
            return Err(BootError::ConfigurationError("payload above 1 MiB"));
        }
        if self.tbds_capacity < tbds::HEADER_LEN {
            return Err(BootError::ConfigurationError("TBDS capacity below header size"));
        }

        Ok(())
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
