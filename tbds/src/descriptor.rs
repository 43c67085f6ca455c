//! Descriptor headers and the payload layouts agreed between loader and kernel

use bitflags::bitflags;

use crate::error::{Result, TbdsError};
use crate::header::{read_u16, read_u32};

/// Encoded descriptor header size in bytes
pub const DESCRIPTOR_HEADER_LEN: usize = 8;

/// Descriptor type tag
///
/// Unknown tags survive a decode/encode cycle unchanged so that older kernels
/// can skip descriptors added by newer loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    BootDevice,
    Console,
    Firmware,
    Unknown(u16),
}

impl DescriptorType {
    pub const fn from_code(code: u16) -> Self {
        match code {
            1 => Self::BootDevice,
            2 => Self::Console,
            3 => Self::Firmware,
            other => Self::Unknown(other),
        }
    }

    pub const fn code(&self) -> u16 {
        match self {
            Self::BootDevice => 1,
            Self::Console => 2,
            Self::Firmware => 3,
            Self::Unknown(code) => *code,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BootDevice => "boot-device",
            Self::Console => "console",
            Self::Firmware => "firmware",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Generic per-descriptor header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorHeader {
    pub kind: DescriptorType,
    pub flags: u16,
    /// Payload length in bytes, header excluded
    pub length: u16,
    pub reserved: u16,
}

impl DescriptorHeader {
    pub const fn new(kind: DescriptorType, flags: u16, length: u16) -> Self {
        Self {
            kind,
            flags,
            length,
            reserved: 0,
        }
    }

    pub fn encode(&self) -> [u8; DESCRIPTOR_HEADER_LEN] {
        let mut out = [0u8; DESCRIPTOR_HEADER_LEN];
        out[0..2].copy_from_slice(&self.kind.code().to_le_bytes());
        out[2..4].copy_from_slice(&self.flags.to_le_bytes());
        out[4..6].copy_from_slice(&self.length.to_le_bytes());
        out[6..8].copy_from_slice(&self.reserved.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < DESCRIPTOR_HEADER_LEN {
            return Err(TbdsError::Truncated { offset: bytes.len() });
        }

        Ok(Self {
            kind: DescriptorType::from_code(read_u16(bytes, 0)),
            flags: read_u16(bytes, 2),
            length: read_u16(bytes, 4),
            reserved: read_u16(bytes, 6),
        })
    }

    /// Bytes this descriptor occupies in the block, header included
    pub fn encoded_len(&self) -> usize {
        DESCRIPTOR_HEADER_LEN + self.length as usize
    }
}

bitflags! {
    /// Capability word of the boot-device descriptor
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BootDeviceFlags: u16 {
        /// Firmware answered the INT 13h extensions check
        const LBA_EXTENSIONS = 1 << 0;
        /// Drive number has bit 7 set (hard disk rather than floppy)
        const FIXED_DISK = 1 << 1;
    }
}

/// Where the boot came from and how the loader found the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootDevice {
    pub drive: u8,
    /// Identifier of the loader stage that produced this block
    pub loader_stage: u8,
    pub flags: BootDeviceFlags,
    pub stage2_lba: u32,
    pub payload_lba: u32,
    pub payload_sectors: u32,
}

impl BootDevice {
    pub const ENCODED_LEN: usize = 16;

    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0] = self.drive;
        out[1] = self.loader_stage;
        out[2..4].copy_from_slice(&self.flags.bits().to_le_bytes());
        out[4..8].copy_from_slice(&self.stage2_lba.to_le_bytes());
        out[8..12].copy_from_slice(&self.payload_lba.to_le_bytes());
        out[12..16].copy_from_slice(&self.payload_sectors.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::ENCODED_LEN {
            return Err(TbdsError::Truncated { offset: bytes.len() });
        }

        Ok(Self {
            drive: bytes[0],
            loader_stage: bytes[1],
            flags: BootDeviceFlags::from_bits_retain(read_u16(bytes, 2)),
            stage2_lba: read_u32(bytes, 4),
            payload_lba: read_u32(bytes, 8),
            payload_sectors: read_u32(bytes, 12),
        })
    }
}

/// Console availability and text geometry. Cell dimensions are 0 when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsoleInfo {
    pub text: bool,
    pub graphical: bool,
    pub serial: bool,
    pub columns: u16,
    pub rows: u16,
    pub cell_width: u16,
    pub cell_height: u16,
}

impl ConsoleInfo {
    pub const ENCODED_LEN: usize = 12;

    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0] = u8::from(self.text);
        out[1] = u8::from(self.graphical);
        out[2] = u8::from(self.serial);
        out[4..6].copy_from_slice(&self.columns.to_le_bytes());
        out[6..8].copy_from_slice(&self.rows.to_le_bytes());
        out[8..10].copy_from_slice(&self.cell_width.to_le_bytes());
        out[10..12].copy_from_slice(&self.cell_height.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::ENCODED_LEN {
            return Err(TbdsError::Truncated { offset: bytes.len() });
        }

        Ok(Self {
            text: bytes[0] != 0,
            graphical: bytes[1] != 0,
            serial: bytes[2] != 0,
            columns: read_u16(bytes, 4),
            rows: read_u16(bytes, 6),
            cell_width: read_u16(bytes, 8),
            cell_height: read_u16(bytes, 10),
        })
    }
}
